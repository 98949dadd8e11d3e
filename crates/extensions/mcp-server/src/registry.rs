//! Tool registry keyed by tool id.

use std::sync::Arc;

use dashmap::DashMap;
use sheetgate_protocols::{Tool, ToolDefinition};

use crate::error::ServerError;

/// Tools exposed through `tools/list` and `tools/call`.
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Register a tool. Ids must be unique.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), ServerError> {
        let id = tool.definition().id.clone();
        if self.tools.contains_key(&id) {
            return Err(ServerError::DuplicateTool(id));
        }
        self.tools.insert(id, tool);
        Ok(())
    }

    /// Register every tool in order, stopping at the first duplicate.
    pub fn register_all(
        &self,
        tools: impl IntoIterator<Item = Arc<dyn Tool>>,
    ) -> Result<(), ServerError> {
        tools.into_iter().try_for_each(|tool| self.register(tool))
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).map(|tool| tool.clone())
    }

    /// Definitions sorted by id so listings are stable.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .iter()
            .map(|entry| entry.value().definition().clone())
            .collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

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
    use async_trait::async_trait;
    use sheetgate_protocols::{ToolContext, ToolError, ToolResult};

    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn new(id: &str) -> Arc<dyn Tool> {
            Arc::new(Self {
                definition: ToolDefinition::new(id, id, "echo"),
            })
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success(params.to_string()))
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(EchoTool::new("get_sheets")).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("get_sheets").is_some());
        assert!(registry.get("write_cells").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let registry = ToolRegistry::new();
        registry.register(EchoTool::new("get_sheets")).unwrap();
        let err = registry.register(EchoTool::new("get_sheets")).unwrap_err();
        assert!(matches!(err, ServerError::DuplicateTool(id) if id == "get_sheets"));
    }

    #[test]
    fn test_definitions_sorted() {
        let registry = ToolRegistry::new();
        registry
            .register_all([EchoTool::new("search_cells"), EchoTool::new("get_sheets")])
            .unwrap();
        let ids: Vec<String> = registry.definitions().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["get_sheets", "search_cells"]);
    }
}
