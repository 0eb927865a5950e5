//! Structured errors for the host adapter.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Errors raised by the adapter itself, before the worker is involved.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Invalid tool parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Tool output could not be serialized.
    #[error("OUTPUT_FAILED: {0}")]
    OutputFailed(String),
}

impl From<AdapterError> for McpError {
    fn from(err: AdapterError) -> Self {
        let code = match &err {
            AdapterError::InvalidInput(_) => -32602,
            AdapterError::OutputFailed(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
