//! Shared utilities for the portfolio voice assistant
//!
//! Logging setup and the application-level configuration shared by the
//! domain crate and the command-line front end.

pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
