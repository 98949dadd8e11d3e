//! Range reads.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sheetgate_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};
use tracing::Instrument;

use super::{call_span, into_tool_result, parse_params};
use crate::query::{Operation, SheetQueryService};

/// One range or a list of ranges.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RangeInput {
    One(String),
    Many(Vec<String>),
}

impl RangeInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RangeInput::One(range) => vec![range],
            RangeInput::Many(ranges) => ranges,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeDataParams {
    pub range_a1: RangeInput,
    #[serde(default)]
    pub return_screenshot: bool,
    #[serde(default)]
    pub return_style: bool,
}

pub struct GetRangeDataTool {
    definition: ToolDefinition,
    service: Arc<SheetQueryService>,
}

impl GetRangeDataTool {
    pub fn new(service: Arc<SheetQueryService>) -> Self {
        let limit = service.config().max_cells;
        Self {
            definition: ToolDefinition::new(
                "get_range_data",
                "Get Range Data",
                format!(
                    "Get the cell data grid for the specified range(s) (A1 notation) in the \
                     active workbook. WARNING: Do NOT request large ranges! Keep rows × columns \
                     ≤ {limit} cells maximum (e.g., A1:B100 = 200 cells is OK, A1:Z1000 = 26,000 \
                     cells will FAIL). For large datasets, read in smaller chunks or use \
                     search_cells instead."
                ),
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "range_a1": {
                        "anyOf": [
                            {"type": "string"},
                            {"type": "array", "items": {"type": "string"}}
                        ],
                        "description": format!(
                            "The cell/range in A1 notation (e.g., 'A1', 'B2:C3'). IMPORTANT: \
                             Keep range small - rows × columns should be ≤ {limit} cells total."
                        )
                    },
                    "return_screenshot": {
                        "type": "boolean",
                        "description": "Whether to return a screenshot of the range",
                        "default": false
                    },
                    "return_style": {
                        "type": "boolean",
                        "description": "Whether to return style information for cells",
                        "default": false
                    }
                },
                "required": ["range_a1"]
            })),
            service,
        }
    }
}

#[async_trait]
impl Tool for GetRangeDataTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: RangeDataParams = match parse_params(Operation::GetRangeData, params) {
            Ok(p) => p,
            Err(failed) => return Ok(into_tool_result(failed)),
        };
        let ranges = params.range_a1.into_vec();
        let result = self
            .service
            .get_ranges_data(&ranges, params.return_screenshot, params.return_style)
            .instrument(call_span(Operation::GetRangeData, &ctx))
            .await;
        Ok(into_tool_result(result))
    }
}
