//! sw_install tool implementation.
//!
//! Delivers the install event: seeds the current cache generation.

use ppi_worker::{OfflineWorker, ServiceWorker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the sw_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallOutput {
    /// Cache generation that was populated.
    pub generation: String,
    /// URLs stored, in manifest order.
    pub cached: Vec<String>,
}

/// Implementation of the sw_install tool.
pub async fn install_impl(worker: &OfflineWorker) -> Result<CallToolResult, McpError> {
    let outcome = worker.on_install().await?;
    let output = InstallOutput { generation: outcome.generation, cached: outcome.cached };
    Ok(json_result(&output)?)
}
