//! A CDP session attached to a single page.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use super::client::Channel;
use super::error::CdpError;
use super::protocol::ExceptionDetails;

pub struct PageSession {
    target_id: String,
    session_id: String,
    channel: Arc<Channel>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, channel: Arc<Channel>) -> Self {
        Self {
            target_id,
            session_id,
            channel,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command to this page, bounded by the command timeout.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Fix the viewport so screenshots have a stable size.
    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<(), CdpError> {
        self.call(
            "Emulation.setDeviceMetricsOverride",
            Some(json!({
                "width": width,
                "height": height,
                "deviceScaleFactor": 1,
                "mobile": false,
            })),
        )
        .await?;
        Ok(())
    }

    /// Evaluate an expression and return its JSON value. Promises are
    /// awaited. The call has no deadline of its own.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .channel
            .call_unbounded(
                "Runtime.evaluate",
                Some(evaluate_params(expression)),
                Some(&self.session_id),
            )
            .await?;
        script_value(result)
    }

    /// Like [`PageSession::evaluate`] but gives up after `limit`.
    pub async fn evaluate_within(
        &self,
        expression: &str,
        limit: Duration,
    ) -> Result<Value, CdpError> {
        let result = self
            .channel
            .call_within(
                "Runtime.evaluate",
                Some(evaluate_params(expression)),
                Some(&self.session_id),
                limit,
            )
            .await?;
        script_value(result)
    }

    /// Capture the viewport as base64 PNG.
    pub async fn screenshot(&self) -> Result<String, CdpError> {
        let result = self
            .call(
                "Page.captureScreenshot",
                Some(json!({
                    "format": "png",
                    "captureBeyondViewport": false,
                })),
            )
            .await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }
}

fn evaluate_params(expression: &str) -> Value {
    json!({
        "expression": expression,
        "returnByValue": true,
        "awaitPromise": true,
    })
}

/// The returned value, or the script's exception as an error.
fn script_value(result: Value) -> Result<Value, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let details: ExceptionDetails = serde_json::from_value(exception.clone())?;
        return Err(CdpError::JavaScript(details.message()));
    }
    Ok(result["result"]["value"].clone())
}
