//! sw_activate tool implementation.
//!
//! Delivers the activate event: drops stale generations.

use ppi_worker::{OfflineWorker, ServiceWorker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the sw_activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActivateOutput {
    /// The generation now in control.
    pub generation: String,
    /// Stale generations removed.
    pub deleted: Vec<String>,
    /// Stale generations that could not be removed.
    pub failed: Vec<String>,
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl(worker: &OfflineWorker) -> Result<CallToolResult, McpError> {
    let outcome = worker.on_activate().await?;
    let output = ActivateOutput { generation: outcome.kept, deleted: outcome.deleted, failed: outcome.failed };
    Ok(json_result(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::sw_install::install_impl;
    use crate::tools::test_support::{parse_output, site, worker_with};

    #[tokio::test]
    async fn test_activate_before_install() {
        let worker = worker_with(site());
        let err = activate_impl(&worker).await.unwrap_err();
        assert_eq!(err.code.0, -32022);
    }

    #[tokio::test]
    async fn test_activate_after_install() {
        let worker = worker_with(site());
        install_impl(&worker).await.unwrap();

        let result = activate_impl(&worker).await.unwrap();
        let output: ActivateOutput = parse_output(&result);

        assert_eq!(output.generation, "ei-ppi-cache-v1");
        assert!(output.deleted.is_empty());
        assert!(output.failed.is_empty());
    }
}
