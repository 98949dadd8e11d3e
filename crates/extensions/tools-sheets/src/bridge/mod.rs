//! The page bridge: one browser session, one page, one in-page API.
//!
//! Everything the gateway knows about the live spreadsheet goes through
//! [`SheetPage::evaluate`]. Scripts are JavaScript functions whose first
//! parameter receives the page-global API object; remaining parameters
//! are the JSON-encoded arguments, so caller input is never spliced into
//! script text.

mod cdp_bridge;
mod launcher;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;

pub use cdp_bridge::CdpPageBridge;
pub use launcher::find_chrome;

/// A live spreadsheet page.
#[async_trait]
pub trait SheetPage: Send + Sync {
    /// Open the session and wait until the page API is ready.
    async fn start(&self, url: &str, headless: bool) -> Result<(), GatewayError>;

    /// Run `function(api, ...args)` in the page and return its JSON result.
    async fn evaluate(&self, function: &str, args: Vec<Value>) -> Result<Value, GatewayError>;

    /// Capture the current viewport as base64 PNG.
    async fn screenshot(&self) -> Result<String, GatewayError>;

    /// Release the session. Safe to call repeatedly.
    async fn cleanup(&self) -> Result<(), GatewayError>;

    fn is_started(&self) -> bool;
}

/// Evaluate and decode into `T`. A result that does not fit `T` is a page
/// evaluation error; nothing past this point sees untyped JSON.
pub async fn evaluate_as<T: DeserializeOwned>(
    page: &dyn SheetPage,
    function: &str,
    args: Vec<Value>,
) -> Result<T, GatewayError> {
    let value = page.evaluate(function, args).await?;
    decode(value)
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::PageEvaluation(format!("unexpected result shape: {}", e)))
}

/// Build the expression the page evaluates:
/// `(<function>)(window["<global>"], ...<args>)`.
pub(crate) fn build_expression(api_global: &str, function: &str, args: &[Value]) -> String {
    let global = Value::String(api_global.to_string());
    let args = Value::Array(args.to_vec());
    format!("({})(window[{}], ...{})", function.trim(), global, args)
}

/// Expression that is true once the document has loaded and the API exists.
pub(crate) fn readiness_check(api_global: &str) -> String {
    let global = Value::String(api_global.to_string());
    format!(
        "document.readyState !== 'loading' && typeof window[{}] !== 'undefined'",
        global
    )
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
