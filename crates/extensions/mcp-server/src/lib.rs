//! MCP (Model Context Protocol) server for sheetgate.
//!
//! Serves registered tools to an MCP client over newline-delimited
//! JSON-RPC 2.0 on stdio. Only the tools capability is offered.

mod error;
mod protocol;
mod registry;
mod server;
mod transport;

pub use error::ServerError;
pub use protocol::{
    McpContent, McpError, McpMethod, McpRequest, McpResponse, McpToolResult, RequestId,
    ToolCallParams, PROTOCOL_VERSION,
};
pub use registry::ToolRegistry;
pub use server::{McpServer, ServerInfo};
pub use transport::{LineTransport, StdioTransport, Transport, TransportError};
