//! Tool registry for managing available tools

use crate::Tool;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry for managing tools
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(tool = tool.name(), "registering tool");
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<String> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Function definitions for every tool, sorted by name
    ///
    /// This is the shape the voice runtime expects when it is told which
    /// functions it may call.
    pub fn definitions(&self) -> Vec<Value> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        let mut defs: Vec<(String, Value)> = tools
            .values()
            .map(|tool| {
                (
                    tool.name().to_string(),
                    json!({
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.input_schema(),
                    }),
                )
            })
            .collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));
        defs.into_iter().map(|(_, def)| def).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Result;
    use async_trait::async_trait;

    struct FixedTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for FixedTool {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(json!(self.reply))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "answers with a fixed sentence"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    fn tool(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(FixedTool {
            name,
            reply: "The portfolio covers these domains:",
        })
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(tool("get_domains"));
        registry.register(tool("check_portfolio_company"));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("get_domains").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(
            registry.names(),
            vec!["check_portfolio_company".to_string(), "get_domains".to_string()]
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ToolRegistry::new();
        registry.register(tool("get_domains"));
        registry.register(tool("get_domains"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_sorted() {
        let registry = ToolRegistry::new();
        registry.register(tool("rank_companies"));
        registry.register(tool("compare_companies"));

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0]["name"], "compare_companies");
        assert_eq!(defs[1]["name"], "rank_companies");
        assert_eq!(defs[0]["parameters"]["type"], "object");
    }

    #[tokio::test]
    async fn test_execute_through_registry() {
        let registry = ToolRegistry::new();
        registry.register(tool("get_domains"));

        let found = registry.get("get_domains").unwrap();
        let out = found.execute(json!({})).await.unwrap();
        assert_eq!(out, json!("The portfolio covers these domains:"));
    }
}
