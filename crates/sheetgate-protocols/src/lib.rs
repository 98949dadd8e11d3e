//! # sheetgate protocols
//!
//! Interface definitions shared by the sheet tools and the MCP server.
//! Contains only the tool seam - no browser or transport code.
//!
//! ## Core Traits
//!
//! - [`Tool`] - Trait for tool implementations

pub mod error;
pub mod tool;
pub mod types;

pub use error::ToolError;
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
