//! The tagged result every query operation returns.

use serde::{Deserialize, Serialize};

use super::types::{ActivityStatus, RangeData, ScrollCapture, SearchResults, SheetList};
use crate::error::{ErrorCode, GatewayError};

/// The five gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetActivityStatus,
    GetRangeData,
    GetSheets,
    SearchCells,
    ScrollAndScreenshot,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetActivityStatus => "get_activity_status",
            Operation::GetRangeData => "get_range_data",
            Operation::GetSheets => "get_sheets",
            Operation::SearchCells => "search_cells",
            Operation::ScrollAndScreenshot => "scroll_and_screenshot",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Status(ActivityStatus),
    RangeData(RangeData),
    SheetList(SheetList),
    SearchResults(SearchResults),
    Screenshot(ScrollCapture),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub code: ErrorCode,
    pub message: String,
}

/// Outcome of one operation: either `data` or `error` is set, never both.
///
/// The screenshot travels beside the JSON body rather than inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryFailure>,
    #[serde(skip)]
    pub screenshot: Option<String>,
}

impl QueryResult {
    pub fn ok(operation: Operation, data: QueryOutput, screenshot: Option<String>) -> Self {
        Self {
            success: true,
            operation,
            data: Some(data),
            error: None,
            screenshot,
        }
    }

    pub fn failed(operation: Operation, error: &GatewayError) -> Self {
        Self {
            success: false,
            operation,
            data: None,
            error: Some(QueryFailure {
                code: error.code(),
                message: error.to_string(),
            }),
            screenshot: None,
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    pub fn status(&self) -> Option<&ActivityStatus> {
        match &self.data {
            Some(QueryOutput::Status(s)) => Some(s),
            _ => None,
        }
    }

    pub fn range_data(&self) -> Option<&RangeData> {
        match &self.data {
            Some(QueryOutput::RangeData(d)) => Some(d),
            _ => None,
        }
    }

    pub fn sheet_list(&self) -> Option<&SheetList> {
        match &self.data {
            Some(QueryOutput::SheetList(l)) => Some(l),
            _ => None,
        }
    }

    pub fn search_results(&self) -> Option<&SearchResults> {
        match &self.data {
            Some(QueryOutput::SearchResults(r)) => Some(r),
            _ => None,
        }
    }

    pub fn scroll_capture(&self) -> Option<&ScrollCapture> {
        match &self.data {
            Some(QueryOutput::Screenshot(c)) => Some(c),
            _ => None,
        }
    }

    /// Pretty JSON body for the tool response.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"operation\":\"{}\",\"error\":{{\"code\":\"PageEvaluationError\",\"message\":\"unserializable result: {}\"}}}}",
                self.operation,
                e.to_string().replace('"', "'")
            )
        })
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
