//! The five read-only spreadsheet tools.

mod range;
mod scroll;
mod search;
mod status;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use sheetgate_protocols::{ImageData, Tool, ToolContext, ToolResult};
use tracing::{info_span, warn, Span};

use crate::error::GatewayError;
use crate::query::{Operation, QueryResult, SheetQueryService};

pub use range::{GetRangeDataTool, RangeDataParams, RangeInput};
pub use scroll::{ScrollAndScreenshotParams, ScrollAndScreenshotTool};
pub use search::{SearchCellsParams, SearchCellsTool};
pub use status::{ActivityStatusParams, GetActivityStatusTool, GetSheetsTool};

/// All sheet tools bound to one service.
pub fn sheet_tools(service: Arc<SheetQueryService>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GetActivityStatusTool::new(service.clone())),
        Arc::new(GetRangeDataTool::new(service.clone())),
        Arc::new(GetSheetsTool::new(service.clone())),
        Arc::new(SearchCellsTool::new(service.clone())),
        Arc::new(ScrollAndScreenshotTool::new(service)),
    ]
}

/// Span around one tool call's page work. Events logged inside it, the
/// audit record included, carry the caller's correlation id.
pub(crate) fn call_span(operation: Operation, ctx: &ToolContext) -> Span {
    info_span!(
        "tool_call",
        operation = operation.as_str(),
        correlation_id = %ctx.correlation_id
    )
}

/// Decode tool arguments. Absent arguments count as an empty object.
pub(crate) fn parse_params<T: DeserializeOwned>(
    operation: Operation,
    params: Value,
) -> Result<T, QueryResult> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| {
        let error = GatewayError::InvalidArguments(e.to_string());
        warn!(operation = %operation, "{}", error);
        QueryResult::failed(operation, &error)
    })
}

/// Render a query result as a tool result: pretty JSON text, the same
/// JSON as structured output, and the screenshot as an image.
pub(crate) fn into_tool_result(result: QueryResult) -> ToolResult {
    let body = result.to_json_pretty();
    let structured = serde_json::to_value(&result).unwrap_or(Value::Null);

    let mut out = match &result.error {
        None => ToolResult::success_json(body, structured),
        Some(failure) => {
            let mut out = ToolResult::error(failure.message.clone())
                .with_metadata("error_code", Value::from(failure.code.as_str()));
            out.content = body;
            out.structured_output = Some(structured);
            out
        }
    };
    out = out.with_metadata("operation", Value::from(result.operation.as_str()));

    match result.screenshot {
        Some(png) => out.with_image(ImageData::png(png)),
        None => out,
    }
}
