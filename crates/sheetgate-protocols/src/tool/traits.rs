//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;

/// Core trait for tools.
///
/// Tools are executable units that an MCP client can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    /// Reject parameters whose shape cannot match the schema. Runs before
    /// [`Tool::execute`]; field-level checks stay with the tool.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let definition = self.definition();
        if let Some(schema) = &definition.parameters_schema {
            if schema.get("type") == Some(&serde_json::json!("object")) && !params.is_object() {
                return Err(ToolError::ValidationFailed(
                    "Parameters must be an object".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool for testing"),
            }
        }

        fn with_schema(schema: serde_json::Value) -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool")
                    .with_parameters_schema(schema),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            _ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success("executed"))
        }
    }

    #[test]
    fn test_tool_definition() {
        let tool = MockTool::new();
        assert_eq!(tool.definition().id, "mock_tool");
    }

    #[test]
    fn test_tool_validate_no_schema() {
        let tool = MockTool::new();
        assert!(tool.validate(&serde_json::json!("anything")).is_ok());
    }

    #[test]
    fn test_tool_validate_object_schema() {
        let tool = MockTool::with_schema(serde_json::json!({"type": "object"}));
        assert!(tool.validate(&serde_json::json!({})).is_ok());
        assert!(tool.validate(&serde_json::json!([1, 2])).is_err());
        assert!(tool.validate(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn test_tool_validate_error_message() {
        let tool = MockTool::with_schema(serde_json::json!({"type": "object"}));
        match tool.validate(&serde_json::json!(42)).unwrap_err() {
            ToolError::ValidationFailed(msg) => assert!(msg.contains("must be an object")),
            other => panic!("Expected ValidationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = MockTool::new();
        let result = tool.execute(serde_json::json!({}), ToolContext::new()).await.unwrap();
        assert_eq!(result.content, "executed");
    }
}
