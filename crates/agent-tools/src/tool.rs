//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that the assistant can execute
///
/// Each tool must provide a name, a description the voice model reads to
/// decide when to call it, and a JSON schema for its input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value. Portfolio tools return a JSON string that
    /// is read aloud as-is.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// // Schema for a tool that looks up one company by name:
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "company_name": { "type": "string" }
    ///     },
    ///     "required": ["company_name"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;
}
