//! ppi-offline host adapter entry point.
//!
//! Boots the offline cache manager behind an MCP server on stdio transport.
//! The host drives the worker through three tools, one per lifecycle event.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use ppi_client::{FetchConfig, Fetcher, HttpFetcher};
use ppi_core::{AppConfig, CacheDb, CacheStore, MemoryStore, StorageBackend};
use ppi_worker::{OfflineWorker, WorkerConfig};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let store: Arc<dyn CacheStore> = match config.storage {
        StorageBackend::Sqlite => Arc::new(CacheDb::open(&config.db_path).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        ..Default::default()
    })?);

    let worker = Arc::new(OfflineWorker::new(WorkerConfig::from_app_config(&config)?, store, fetcher.clone()));

    tracing::info!(
        origin = %config.origin,
        generation = %config.cache_version,
        storage = ?config.storage,
        "Starting ppi-offline on stdio transport"
    );

    let handler = handler::PpiOfflineServer::new(worker, fetcher);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
