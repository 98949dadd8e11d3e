//! MCP request handling and the serve loop.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{json, Value};
use sheetgate_protocols::{ToolContext, ToolError, ToolResult};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::protocol::{
    McpError, McpMethod, McpRequest, McpResponse, McpToolResult, RequestId, ToolCallParams,
    PROTOCOL_VERSION,
};
use crate::registry::ToolRegistry;
use crate::transport::Transport;

/// Name and version reported in `initialize`.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "sheetgate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// MCP server. Requests are handled one at a time in arrival order.
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
    initialized: AtomicBool,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo::default(),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn with_server_info(mut self, info: ServerInfo) -> Self {
        self.info = info;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Serve until end of input.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<(), ServerError> {
        self.run_until(transport, std::future::pending::<()>()).await
    }

    /// Serve until end of input or until `shutdown` resolves.
    ///
    /// Shutdown also interrupts a request in flight; its response is
    /// dropped and the pending page work is cancelled with it.
    pub async fn run_until<T, F>(&self, transport: &mut T, shutdown: F) -> Result<(), ServerError>
    where
        T: Transport,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(tools = self.registry.len(), "MCP server listening on stdio");

        loop {
            let line = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping MCP server");
                    return Ok(());
                }
                line = transport.receive() => line?,
            };

            let Some(line) = line else {
                info!("Input closed, stopping MCP server");
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            let response = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested during a request, stopping MCP server");
                    return Ok(());
                }
                response = self.handle_line(&line) => response,
            };
            if let Some(response) = response {
                transport.send(&response).await?;
            }
        }
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparsable message: {}", e);
                return Some(McpResponse::error(
                    None,
                    McpError::parse_error().with_data(Value::from(e.to_string())),
                ));
            }
        };

        let request: McpRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid request: {}", e);
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                return Some(McpResponse::error(
                    id,
                    McpError::invalid_request().with_data(Value::from(e.to_string())),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(request.id, McpError::invalid_request()));
        }

        self.handle_request(request).await
    }

    /// Dispatch a parsed request.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let method = McpMethod::parse(&request.method);

        let Some(id) = request.id else {
            match method {
                Some(McpMethod::Initialized) => {
                    self.initialized.store(true, Ordering::SeqCst);
                    debug!("Client finished initialization");
                }
                _ => debug!(method = %request.method, "Ignoring notification"),
            }
            return None;
        };

        if !matches!(method, Some(McpMethod::Initialize | McpMethod::Ping))
            && !self.is_initialized()
        {
            warn!(method = %request.method, "Request received before initialization");
        }

        let outcome = match method {
            Some(McpMethod::Initialize) => Ok(self.handle_initialize(request.params.as_ref())),
            Some(McpMethod::Ping) => Ok(json!({})),
            Some(McpMethod::ListTools) => Ok(self.handle_tools_list()),
            Some(McpMethod::CallTool) => self.handle_tools_call(&id, request.params).await,
            Some(McpMethod::Initialized) | None => {
                debug!(method = %request.method, "Unknown method");
                Err(McpError::method_not_found())
            }
        };

        Some(match outcome {
            Ok(result) => McpResponse::success(Some(id), result),
            Err(error) => McpResponse::error(Some(id), error),
        })
    }

    fn handle_initialize(&self, params: Option<&Value>) -> Value {
        let client = params
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(client = %client, "Client connected");
        self.initialized.store(true, Ordering::SeqCst);

        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version,
            }
        })
    }

    fn handle_tools_list(&self) -> Value {
        let tools: Vec<Value> = self
            .registry
            .definitions()
            .iter()
            .map(|definition| definition.to_mcp_tool())
            .collect();
        json!({ "tools": tools })
    }

    async fn handle_tools_call(
        &self,
        id: &RequestId,
        params: Option<Value>,
    ) -> Result<Value, McpError> {
        let params: ToolCallParams = params
            .ok_or_else(McpError::invalid_params)
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| {
                    McpError::invalid_params().with_data(Value::from(e.to_string()))
                })
            })?;

        let result = match self.dispatch(&params.name, params.arguments, id).await {
            Ok(result) => McpToolResult::from(result),
            Err(e) => {
                warn!(tool = %params.name, "Tool call rejected: {}", e);
                McpToolResult::rejected(&params.name, e.to_string())
            }
        };

        serde_json::to_value(result)
            .map_err(|e| McpError::internal_error().with_data(Value::from(e.to_string())))
    }

    /// Resolve and validate, then run the tool. Absent arguments count as
    /// an empty object.
    async fn dispatch(
        &self,
        name: &str,
        arguments: Value,
        id: &RequestId,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let arguments = if arguments.is_null() {
            Value::Object(Default::default())
        } else {
            arguments
        };
        tool.validate(&arguments)?;

        let ctx = ToolContext::with_correlation_id(id.to_string());
        debug!(tool = %name, correlation_id = %ctx.correlation_id, "Calling tool");
        tool.execute(arguments, ctx).await
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
