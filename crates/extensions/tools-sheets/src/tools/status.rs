//! Workbook status and sheet listing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sheetgate_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};
use tracing::Instrument;

use super::{call_span, into_tool_result, parse_params};
use crate::query::{Operation, SheetQueryService};

#[derive(Debug, Deserialize)]
pub struct ActivityStatusParams {
    #[serde(default)]
    pub screenshot: bool,
}

pub struct GetActivityStatusTool {
    definition: ToolDefinition,
    service: Arc<SheetQueryService>,
}

impl GetActivityStatusTool {
    pub fn new(service: Arc<SheetQueryService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_activity_status",
                "Get Activity Status",
                "Get workbook UI status. Returns total sheet count, first 10 sheet names, \
                 current active sheet name, and selection. If screenshot is True, also \
                 returns a screenshot.",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "screenshot": {
                        "type": "boolean",
                        "description": "Whether to return a screenshot",
                        "default": false
                    }
                }
            })),
            service,
        }
    }
}

#[async_trait]
impl Tool for GetActivityStatusTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: ActivityStatusParams = match parse_params(Operation::GetActivityStatus, params) {
            Ok(p) => p,
            Err(failed) => return Ok(into_tool_result(failed)),
        };
        let result = self
            .service
            .get_activity_status(params.screenshot)
            .instrument(call_span(Operation::GetActivityStatus, &ctx))
            .await;
        Ok(into_tool_result(result))
    }
}

/// Lists every sheet; takes no arguments.
pub struct GetSheetsTool {
    definition: ToolDefinition,
    service: Arc<SheetQueryService>,
}

impl GetSheetsTool {
    pub fn new(service: Arc<SheetQueryService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_sheets",
                "Get Sheets",
                "Get all sheets (name and ID) in the current workbook.",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {}
            })),
            service,
        }
    }
}

#[async_trait]
impl Tool for GetSheetsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let result = self
            .service
            .get_sheets()
            .instrument(call_span(Operation::GetSheets, &ctx))
            .await;
        Ok(into_tool_result(result))
    }
}
