//! The surface a host adapter drives.
//!
//! A host delivers three events: install, activate and fetch-intercept.
//! [`ServiceWorker`] is that contract; [`OfflineWorker`] wires it to the
//! lifecycle, the router and the two strategies.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use ppi_client::Fetcher;
use ppi_core::{CacheStore, Error, Request, Response};
use url::Url;

use crate::config::WorkerConfig;
use crate::lifecycle::{ActivateOutcome, InstallOutcome, Lifecycle, WorkerState};
use crate::router::{Route, classify};
use crate::strategy::{CacheFirst, NetworkFirst, StrategyContext};

/// A response the host substitutes for the network's.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Handlers for the three host events.
#[async_trait]
pub trait ServiceWorker: Send + Sync {
    /// Populate the current generation. An error means the host must retry.
    async fn on_install(&self) -> Result<InstallOutcome, Error>;

    /// Drop stale generations and take control of open clients.
    async fn on_activate(&self) -> Result<ActivateOutcome, Error>;

    /// `None` lets the request go to the network untouched.
    fn on_intercept(&self, request: Request) -> Option<ResponseFuture>;
}

/// Offline cache manager for one cache version.
pub struct OfflineWorker {
    origin: Url,
    lifecycle: Lifecycle,
    cache_first: CacheFirst,
    network_first: NetworkFirst,
}

impl OfflineWorker {
    pub fn new(config: WorkerConfig, store: Arc<dyn CacheStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        let ctx = StrategyContext::new(
            store.clone(),
            fetcher.clone(),
            config.cache_version.clone(),
            config.offline_url.clone(),
        );
        Self {
            origin: config.origin.clone(),
            cache_first: CacheFirst::new(ctx.clone()),
            network_first: NetworkFirst::new(ctx),
            lifecycle: Lifecycle::new(config, store, fetcher),
        }
    }

    pub async fn state(&self) -> WorkerState {
        self.lifecycle.state().await
    }

    /// True once an activation has taken control of clients.
    pub fn controls_clients(&self) -> bool {
        self.lifecycle.controls_clients()
    }

    pub fn generation(&self) -> &str {
        self.lifecycle.generation()
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

#[async_trait]
impl ServiceWorker for OfflineWorker {
    async fn on_install(&self) -> Result<InstallOutcome, Error> {
        self.lifecycle.install().await
    }

    async fn on_activate(&self) -> Result<ActivateOutcome, Error> {
        self.lifecycle.activate().await
    }

    fn on_intercept(&self, request: Request) -> Option<ResponseFuture> {
        match classify(&request, &self.origin) {
            Route::PassThrough(reason) => {
                tracing::debug!(url = %request.url, ?reason, "passing through");
                None
            }
            Route::CacheFirst => {
                let strategy = self.cache_first.clone();
                Some(Box::pin(async move { strategy.serve(request).await }))
            }
            Route::NetworkFirst => {
                let strategy = self.network_first.clone();
                Some(Box::pin(async move { strategy.serve(request).await }))
            }
        }
    }
}
