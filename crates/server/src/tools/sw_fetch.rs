//! sw_fetch tool implementation.
//!
//! Delivers a fetch-intercept event. If the worker is not in control yet, or
//! it declines to intervene, the request goes straight to the network.

use ppi_client::{Fetcher, canonicalize};
use ppi_core::{Error, Request};
use ppi_worker::{OfflineWorker, ServiceWorker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::AdapterError;

/// Input parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Absolute URL of the intercepted request.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchOutput {
    /// Whether an activated worker controls this client.
    pub controlled: bool,
    /// Whether the worker answered (false means plain network).
    pub intercepted: bool,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(
    worker: &OfflineWorker, network: &dyn Fetcher, params: FetchParams,
) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(AdapterError::InvalidInput("url cannot be empty".into()).into());
    }
    if params.method.is_empty() || !params.method.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AdapterError::InvalidInput(format!("invalid method: {:?}", params.method)).into());
    }

    let url = canonicalize(&params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let request = Request::new(params.method.to_ascii_uppercase(), url);

    let controlled = worker.controls_clients();
    let intercept = if controlled { worker.on_intercept(request.clone()) } else { None };

    let (intercepted, response) = match intercept {
        Some(pending) => (true, pending.await?),
        None => (false, network.fetch(&request).await?),
    };

    tracing::debug!(
        url = %request.url,
        controlled,
        intercepted,
        status = response.status,
        "fetch event handled"
    );

    let output = FetchOutput {
        controlled,
        intercepted,
        status: response.status,
        headers: response.headers.clone(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    };
    Ok(json_result(&output)?)
}
