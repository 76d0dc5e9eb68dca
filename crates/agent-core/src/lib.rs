//! Core abstractions for the portfolio voice assistant
//!
//! This crate defines the traits and types shared by the domain crate and the
//! command-line front end: the [`Agent`] trait that turns an utterance into a
//! spoken answer, the per-call [`Context`], and the common error type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
