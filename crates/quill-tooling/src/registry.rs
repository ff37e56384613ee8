//! Tool registry for looking tools up by name.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;

type ToolMap = Arc<HashMap<String, Arc<dyn Tool>>>;

/// Read-only lookup from tool name to handler.
///
/// Registration happens while building the registry; the engine only ever
/// reads from it. Cloning is cheap and shares the underlying map.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: ToolMap,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(HashMap::new()),
        }
    }

    /// Add a tool to the registry, replacing any tool with the same name
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        let name = tool.name().to_owned();
        if Arc::make_mut(&mut self.tools).insert(name.clone(), tool).is_some() {
            tracing::debug!("Replaced previously registered tool '{name}'");
        }
        self
    }

    /// Get a tool by name, if it exists
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(Arc::clone)
    }

    /// Whether a tool with this name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, sorted
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ToolInput, ToolOutput, ToolResult};
    use async_trait::async_trait;

    struct MockTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for MockTool {
        fn name(&self) -> &str {
            self.name
        }

        async fn execute(&self, _input: ToolInput) -> ToolResult<ToolOutput> {
            Ok(ToolOutput::success(self.reply))
        }
    }

    fn mock(name: &'static str, reply: &'static str) -> Arc<dyn Tool> {
        Arc::new(MockTool { name, reply })
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_get_tool() {
        let registry = ToolRegistry::default().with_tool(mock("word_set_font", "ok"));

        assert!(registry.get_tool("word_set_font").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
        assert!(registry.contains("word_set_font"));
    }

    #[test]
    fn test_tool_names_sorted() {
        let registry = ToolRegistry::default()
            .with_tool(mock("word_set_font", "ok"))
            .with_tool(mock("word_apply_style", "ok"));

        assert_eq!(registry.tool_names(), vec!["word_apply_style", "word_set_font"]);
    }

    #[tokio::test]
    async fn test_same_name_replaces() {
        let registry = ToolRegistry::default()
            .with_tool(mock("word_set_font", "first"))
            .with_tool(mock("word_set_font", "second"));
        assert_eq!(registry.len(), 1);

        let tool = registry.get_tool("word_set_font").unwrap();
        let output = tool.execute(ToolInput::default()).await.unwrap();
        assert_eq!(output.message, "second");
    }

    #[test]
    fn test_clones_share_tools() {
        let registry = ToolRegistry::default().with_tool(mock("a", "ok"));
        let extended = registry.clone().with_tool(mock("b", "ok"));

        assert_eq!(registry.len(), 1);
        assert_eq!(extended.len(), 2);
    }
}
