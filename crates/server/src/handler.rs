//! MCP server handler implementation.
//!
//! Routes the three host events, exposed as tools, to the offline worker.
use std::sync::Arc;

use ppi_client::Fetcher;
use ppi_worker::OfflineWorker;

use crate::tools::sw_activate::activate_impl;
use crate::tools::sw_fetch::{FetchParams, fetch_impl};
use crate::tools::sw_install::install_impl;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for ppi-offline.
#[derive(Clone)]
pub struct PpiOfflineServer {
    worker: Arc<OfflineWorker>,
    network: Arc<dyn Fetcher>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl PpiOfflineServer {
    /// Create a new server handler around a worker and the plain network path.
    pub fn new(worker: Arc<OfflineWorker>, network: Arc<dyn Fetcher>) -> Self {
        Self { worker, network, tool_router: Self::tool_router() }
    }

    /// Install event.
    #[tool(description = "Install event. Fetches the seed manifest into the current cache generation. Fails if any entry cannot be fetched; retry later.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker).await
    }

    /// Activate event.
    #[tool(description = "Activate event. Deletes every cache generation except the current one and takes control of open clients.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker).await
    }

    /// Fetch-intercept event.
    #[tool(description = "Fetch event. Answers a request through the offline cache (cache-first for same-origin, network-first for cross-origin) or passes it to the network.")]
    async fn sw_fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, self.network.as_ref(), params.0).await
    }
}

impl ServerHandler for PpiOfflineServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "ppi-offline".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{site, worker_with};

    #[test]
    fn test_exactly_three_event_tools() {
        let fetcher = site();
        let server = PpiOfflineServer::new(worker_with(fetcher.clone()), fetcher);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["sw_activate", "sw_fetch", "sw_install"]);
    }

    #[test]
    fn test_server_info() {
        let fetcher = site();
        let server = PpiOfflineServer::new(worker_with(fetcher.clone()), fetcher);
        assert_eq!(server.get_info().server_info.name, "ppi-offline");
    }
}
