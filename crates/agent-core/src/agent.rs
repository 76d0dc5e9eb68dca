//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent receives one utterance (already transcribed by the transport
/// layer) and returns the text the speech synthesizer should read aloud.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Answer one utterance
    ///
    /// The voice transport hands over text and reads text back.
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
