//! Scroll to a cell and capture the viewport.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sheetgate_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};
use tracing::Instrument;

use super::{call_span, into_tool_result, parse_params};
use crate::query::{Operation, SheetQueryService};

#[derive(Debug, Deserialize)]
pub struct ScrollAndScreenshotParams {
    pub cell_a1: String,
}

pub struct ScrollAndScreenshotTool {
    definition: ToolDefinition,
    service: Arc<SheetQueryService>,
}

impl ScrollAndScreenshotTool {
    pub fn new(service: Arc<SheetQueryService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "scroll_and_screenshot",
                "Scroll And Screenshot",
                "Scroll the UI so the specified cell is at the top-left of the viewport, \
                 then capture and return a screenshot.",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "cell_a1": {
                        "type": "string",
                        "description": "The cell in A1 notation to scroll to (e.g., 'D10')"
                    }
                },
                "required": ["cell_a1"]
            })),
            service,
        }
    }
}

#[async_trait]
impl Tool for ScrollAndScreenshotTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ScrollAndScreenshotParams =
            match parse_params(Operation::ScrollAndScreenshot, params) {
                Ok(p) => p,
                Err(failed) => return Ok(into_tool_result(failed)),
            };
        let result = self
            .service
            .scroll_and_screenshot(&params.cell_a1)
            .instrument(call_span(Operation::ScrollAndScreenshot, &ctx))
            .await;
        Ok(into_tool_result(result))
    }
}
