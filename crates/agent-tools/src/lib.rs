//! Tool management and execution framework
//!
//! Tools are the functions the voice runtime may call on the assistant's
//! behalf. Each tool takes a JSON object of parameters and returns JSON.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
