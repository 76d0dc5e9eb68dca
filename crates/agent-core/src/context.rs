//! Execution context for agents
//!
//! The `Context` carries participant-scoped settings handed over by the voice
//! transport for a single call. It is built per call and never outlives it;
//! nothing learned from one utterance is stored here for the next.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Session ID assigned by the transport
    pub const SESSION_ID: &str = "session_id";
    /// Identity of the participant who spoke
    pub const PARTICIPANT: &str = "participant";
    /// Whether news answers use the one-line rendering
    pub const NEWS_BRIEF: &str = "news_brief";
    /// Date used as "today" when resolving year-less news dates (YYYY-MM-DD)
    pub const REFERENCE_DATE: &str = "reference_date";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_session_id("room-42")
///     .with_news_brief(false);
///
/// assert_eq!(ctx.session_id(), Some("room-42"));
/// assert_eq!(ctx.news_brief(), Some(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Set the participant identity
    pub fn with_participant(mut self, identity: impl Into<String>) -> Self {
        self.insert(keys::PARTICIPANT, serde_json::json!(identity.into()));
        self
    }

    /// Choose brief or full news rendering
    pub fn with_news_brief(mut self, brief: bool) -> Self {
        self.insert(keys::NEWS_BRIEF, serde_json::json!(brief));
        self
    }

    /// Pin the date treated as "today"
    pub fn with_reference_date(mut self, date: impl Into<String>) -> Self {
        self.insert(keys::REFERENCE_DATE, serde_json::json!(date.into()));
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    pub fn participant(&self) -> Option<&str> {
        self.get(keys::PARTICIPANT).and_then(|v| v.as_str())
    }

    pub fn news_brief(&self) -> Option<bool> {
        self.get(keys::NEWS_BRIEF).and_then(serde_json::Value::as_bool)
    }

    pub fn reference_date(&self) -> Option<&str> {
        self.get(keys::REFERENCE_DATE).and_then(|v| v.as_str())
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a typed value from the context
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value `{key}`: {e}"
                    ))
                }),
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let ctx = Context::new()
            .with_session_id("room-1")
            .with_participant("caller")
            .with_news_brief(true)
            .with_reference_date("2025-01-05");

        assert_eq!(ctx.session_id(), Some("room-1"));
        assert_eq!(ctx.participant(), Some("caller"));
        assert_eq!(ctx.news_brief(), Some(true));
        assert_eq!(ctx.reference_date(), Some("2025-01-05"));
        assert_eq!(ctx.len(), 4);
    }

    #[test]
    fn test_empty_context_has_no_preferences() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.news_brief(), None);
        assert_eq!(ctx.reference_date(), None);
    }

    #[test]
    fn test_get_typed() {
        let mut ctx = Context::new();
        ctx.insert("limit", serde_json::json!(3));

        let limit: Option<usize> = ctx.get_typed("limit").unwrap();
        assert_eq!(limit, Some(3));
        assert!(ctx.contains_key("limit"));

        let missing: Option<usize> = ctx.get_typed("missing").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_typed_wrong_shape() {
        let mut ctx = Context::new();
        ctx.insert("limit", serde_json::json!("three"));

        let result: crate::Result<Option<usize>> = ctx.get_typed("limit");
        assert!(result.is_err());
    }
}
