//! Response strategies.
//!
//! Both strategies end in the same fallback chain: a real response, else the
//! cached entry, else the offline page from the current generation. Only a
//! missing offline page surfaces as an error.

mod cache_first;
mod network_first;

use std::sync::Arc;

use ppi_client::Fetcher;
use ppi_core::{CacheStore, Error, Request, Response};
use url::Url;

pub use cache_first::CacheFirst;
pub use network_first::NetworkFirst;

/// Capabilities and targets shared by both strategies.
#[derive(Clone)]
pub struct StrategyContext {
    pub store: Arc<dyn CacheStore>,
    pub fetcher: Arc<dyn Fetcher>,
    pub generation: String,
    pub offline_url: Url,
}

impl StrategyContext {
    pub fn new(
        store: Arc<dyn CacheStore>, fetcher: Arc<dyn Fetcher>, generation: impl Into<String>, offline_url: Url,
    ) -> Self {
        Self { store, fetcher, generation: generation.into(), offline_url }
    }

    /// Cache lookup where a storage failure counts as a miss.
    async fn lookup(&self, request: &Request) -> Option<Response> {
        match self.store.match_request(&self.generation, request).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "cache lookup failed; treating as miss");
                None
            }
        }
    }

    /// Store an ok response; anything else is left out of the cache.
    async fn store_if_ok(&self, request: &Request, response: &Response) {
        if !response.is_ok() {
            tracing::debug!(url = %request.url, status = response.status, "not caching non-ok response");
            return;
        }
        if let Err(e) = self.store.put(&self.generation, request, response).await {
            tracing::warn!(url = %request.url, error = %e, "failed to store response");
        }
    }

    /// Terminal fallback: the offline page from the current generation.
    /// An unreadable page counts as missing.
    async fn offline_fallback(&self) -> Result<Response, Error> {
        let request = Request::get(self.offline_url.clone());
        match self.lookup(&request).await {
            Some(page) => {
                tracing::debug!(url = %self.offline_url, "serving offline fallback");
                Ok(page)
            }
            None => Err(Error::OfflineFallbackMissing(self.offline_url.to_string())),
        }
    }
}

impl std::fmt::Debug for StrategyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("generation", &self.generation)
            .field("offline_url", &self.offline_url.as_str())
            .finish_non_exhaustive()
    }
}
