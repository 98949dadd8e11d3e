//! Server errors.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
