//! Tool dispatch errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_not_found() {
        let err = ToolError::NotFound("write_cells".to_string());
        assert!(err.to_string().contains("Tool not found"));
        assert!(err.to_string().contains("write_cells"));
    }

    #[test]
    fn test_tool_error_validation_failed() {
        let err = ToolError::ValidationFailed("Parameters must be an object".to_string());
        assert_eq!(
            err.to_string(),
            "Parameter validation failed: Parameters must be an object"
        );
    }
}
