//! Tool registry
//!
//! Holds tools keyed by name. Registration order is kept so exports are
//! deterministic; replacing a tool keeps its original slot.

use indexmap::IndexMap;

use super::schema::SchemaError;
use super::{Tool, ToolDefinition};

#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any tool with the same name
    pub fn register_tool(&mut self, tool: Tool) {
        let name = tool.name.clone();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "Replaced registered tool");
        } else {
            tracing::debug!(tool = %name, "Registered tool");
        }
    }

    /// Like [`register_tool`](Self::register_tool) but rejects malformed schemas
    pub fn register_tool_checked(&mut self, tool: Tool) -> Result<(), SchemaError> {
        tool.input_schema.check()?;
        self.register_tool(tool);
        Ok(())
    }

    /// Remove a tool; absent names are ignored
    pub fn unregister_tool(&mut self, name: &str) -> Option<Tool> {
        let removed = self.tools.shift_remove(name);
        if removed.is_some() {
            tracing::debug!(tool = %name, "Unregistered tool");
        }
        removed
    }

    pub fn get_tool(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// All tools in registration order
    pub fn get_tools(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn clear_tools(&mut self) {
        self.tools.clear();
    }

    /// Name/description/schema triples, handlers stripped
    pub fn export_for_invocation(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(Tool::definition).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{handler_fn, InputSchema};
    use mcp_protocol::text_success;

    fn tool(name: &str, description: &str) -> Tool {
        let reply = description.to_string();
        Tool::new(
            name,
            description,
            InputSchema::new(),
            handler_fn(move |_| {
                let reply = reply.clone();
                async move { Ok(text_success(reply)) }
            }),
        )
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        let t = tool("get_products", "List products");
        registry.register_tool(t.clone());

        let found = registry.get_tool("get_products").unwrap();
        assert!(found.same_handler(&t));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_last_write_wins_keeps_slot() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(tool("a", "first"));
        registry.register_tool(tool("b", "other"));
        let replacement = tool("a", "second");
        registry.register_tool(replacement.clone());

        assert_eq!(registry.len(), 2);
        let found = registry.get_tool("a").unwrap();
        assert_eq!(found.description, "second");
        assert!(found.same_handler(&replacement));
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(tool("a", "first"));

        assert!(registry.unregister_tool("missing").is_none());
        assert_eq!(registry.get_tools().len(), 1);

        assert!(registry.unregister_tool("a").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_tools() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(tool("a", "first"));
        registry.register_tool(tool("b", "second"));
        registry.clear_tools();
        assert!(registry.is_empty());
        assert!(registry.get_tool("a").is_none());
    }

    #[test]
    fn test_register_checked_rejects_bad_schema() {
        let mut registry = ToolRegistry::new();
        let mut bad = tool("bad", "broken schema");
        bad.input_schema = InputSchema::new().required("ghost");

        assert!(registry.register_tool_checked(bad).is_err());
        assert!(!registry.contains("bad"));
        assert!(registry.register_tool_checked(tool("good", "ok")).is_ok());
    }

    #[test]
    fn test_export_for_invocation() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(tool("a", "first"));
        registry.register_tool(tool("b", "second"));

        let exported = registry.export_for_invocation();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].name, "a");
        assert_eq!(exported[1].description, "second");
    }
}
