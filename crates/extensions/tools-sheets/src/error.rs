//! Gateway error taxonomy.
//!
//! Every failure a tool call can report maps onto one [`ErrorCode`]; the
//! code is part of the tool result and stays stable across releases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cdp::CdpError;

/// Stable, machine-readable error code carried by failure results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidRangeSyntax,
    RangeTooLarge,
    BrowserNotStarted,
    ConnectionTimeout,
    PageEvaluationError,
    SessionAlreadyStarted,
    LaunchFailed,
    InvalidArguments,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRangeSyntax => "InvalidRangeSyntax",
            ErrorCode::RangeTooLarge => "RangeTooLarge",
            ErrorCode::BrowserNotStarted => "BrowserNotStarted",
            ErrorCode::ConnectionTimeout => "ConnectionTimeout",
            ErrorCode::PageEvaluationError => "PageEvaluationError",
            ErrorCode::SessionAlreadyStarted => "SessionAlreadyStarted",
            ErrorCode::LaunchFailed => "LaunchFailed",
            ErrorCode::InvalidArguments => "InvalidArguments",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by range parsing, the page bridge and the query service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid range '{input}': {reason}")]
    InvalidRangeSyntax { input: String, reason: String },

    #[error(
        "Range {range} covers {cells} cells, over the {limit}-cell limit. \
         Read it in smaller chunks or use search_cells"
    )]
    RangeTooLarge { range: String, cells: u64, limit: u64 },

    #[error("Browser not started. Call start() first")]
    BrowserNotStarted,

    #[error("Page API '{global}' was not ready after {timeout_ms} ms")]
    ConnectionTimeout { global: String, timeout_ms: u64 },

    #[error("Page evaluation failed: {0}")]
    PageEvaluation(String),

    #[error("Browser session already started")]
    SessionAlreadyStarted,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl GatewayError {
    pub(crate) fn syntax(input: &str, reason: impl Into<String>) -> Self {
        GatewayError::InvalidRangeSyntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// The stable code reported to callers.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidRangeSyntax { .. } => ErrorCode::InvalidRangeSyntax,
            GatewayError::RangeTooLarge { .. } => ErrorCode::RangeTooLarge,
            GatewayError::BrowserNotStarted => ErrorCode::BrowserNotStarted,
            GatewayError::ConnectionTimeout { .. } => ErrorCode::ConnectionTimeout,
            GatewayError::PageEvaluation(_) => ErrorCode::PageEvaluationError,
            GatewayError::SessionAlreadyStarted => ErrorCode::SessionAlreadyStarted,
            GatewayError::LaunchFailed(_) => ErrorCode::LaunchFailed,
            GatewayError::InvalidArguments(_) => ErrorCode::InvalidArguments,
        }
    }
}

impl From<CdpError> for GatewayError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                GatewayError::LaunchFailed(msg)
            }
            CdpError::SessionClosed => GatewayError::BrowserNotStarted,
            CdpError::JavaScript(msg) => GatewayError::PageEvaluation(msg),
            other => GatewayError::PageEvaluation(other.to_string()),
        }
    }
}
