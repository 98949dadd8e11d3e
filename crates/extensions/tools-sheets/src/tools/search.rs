//! Keyword search.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sheetgate_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};
use tracing::Instrument;

use super::{call_span, into_tool_result, parse_params};
use crate::query::{MatchKind, Operation, SheetQueryService};

#[derive(Debug, Deserialize)]
pub struct SearchCellsParams {
    pub keyword: String,
    pub find_by: MatchKind,
    #[serde(default)]
    pub max_results: Option<usize>,
}

pub struct SearchCellsTool {
    definition: ToolDefinition,
    service: Arc<SheetQueryService>,
}

impl SearchCellsTool {
    pub fn new(service: Arc<SheetQueryService>) -> Self {
        let default_max = service.config().search_max_results;
        Self {
            definition: ToolDefinition::new(
                "search_cells",
                "Search Cells",
                "Search cells in the currently active workbook by keyword and findBy type. \
                 Use this tool instead of get_range_data when searching for specific content \
                 in large sheets - it's much more efficient and won't exceed context limits.",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "The search keyword (e.g., '=SUM' to find formulas, 'Total' to find values)"
                    },
                    "find_by": {
                        "type": "string",
                        "description": "The search type: 'formula' to search in formulas, 'value' to search in displayed values",
                        "enum": ["formula", "value"]
                    },
                    "max_results": {
                        "type": "integer",
                        "minimum": 1,
                        "description": format!("Maximum matches to return (default {default_max}); the total count is always reported")
                    }
                },
                "required": ["keyword", "find_by"]
            })),
            service,
        }
    }
}

#[async_trait]
impl Tool for SearchCellsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: SearchCellsParams = match parse_params(Operation::SearchCells, params) {
            Ok(p) => p,
            Err(failed) => return Ok(into_tool_result(failed)),
        };
        let result = self
            .service
            .search_cells(&params.keyword, params.find_by, params.max_results)
            .instrument(call_span(Operation::SearchCells, &ctx))
            .await;
        Ok(into_tool_result(result))
    }
}
