//! MCP tool implementations.
//!
//! One tool per host event: install, activate, fetch-intercept.

pub mod sw_activate;
pub mod sw_fetch;
pub mod sw_install;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::error::AdapterError;

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, AdapterError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| AdapterError::OutputFailed(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
