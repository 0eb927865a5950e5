//! Network-first with cache fallback, for cross-origin requests.

use ppi_core::{Error, Request, Response};

use super::StrategyContext;

#[derive(Debug, Clone)]
pub struct NetworkFirst {
    ctx: StrategyContext,
}

impl NetworkFirst {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Answer `request` from the network, storing ok responses. When the
    /// fetch itself fails, answer from the cache, then the offline page.
    pub async fn serve(&self, request: Request) -> Result<Response, Error> {
        match self.ctx.fetcher.fetch(&request).await {
            Ok(response) => {
                self.ctx.store_if_ok(&request, &response).await;
                Ok(response)
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "network failed; trying cache");
                match self.ctx.lookup(&request).await {
                    Some(cached) => Ok(cached),
                    None => self.ctx.offline_fallback().await,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{GENERATION, ScriptedFetcher, context, seed_offline_page};
    use ppi_core::{CacheStore, MemoryStore};
    use url::Url;

    fn cdn(path: &str) -> Request {
        Request::get(Url::parse("https://cdn.example.com").unwrap().join(path).unwrap())
    }

    #[tokio::test]
    async fn test_success_returns_and_caches() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        fetcher.respond(&cdn("/chart.js").url, Response::new(200, "chart"));

        let strategy = NetworkFirst::new(context(store.clone(), fetcher));
        let response = strategy.serve(cdn("/chart.js")).await.unwrap();

        assert_eq!(response, Response::new(200, "chart"));
        let stored = store.match_request(GENERATION, &cdn("/chart.js")).await.unwrap();
        assert_eq!(stored, Some(Response::new(200, "chart")));
    }

    #[tokio::test]
    async fn test_success_replaces_stale_entry() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        store.put(GENERATION, &cdn("/chart.js"), &Response::new(200, "v1")).await.unwrap();
        fetcher.respond(&cdn("/chart.js").url, Response::new(200, "v2"));

        let strategy = NetworkFirst::new(context(store.clone(), fetcher));
        let response = strategy.serve(cdn("/chart.js")).await.unwrap();

        assert_eq!(response.body, "v2".as_bytes());
        let stored = store.match_request(GENERATION, &cdn("/chart.js")).await.unwrap().unwrap();
        assert_eq!(stored.body, "v2".as_bytes());
    }

    #[tokio::test]
    async fn test_server_error_returned_not_cached() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        fetcher.respond(&cdn("/api/rates").url, Response::new(500, "boom"));

        let strategy = NetworkFirst::new(context(store.clone(), fetcher));
        let response = strategy.serve(cdn("/api/rates")).await.unwrap();

        assert_eq!(response.status, 500);
        assert!(store.match_request(GENERATION, &cdn("/api/rates")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_does_not_evict_previous_entry() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        store.put(GENERATION, &cdn("/api/rates"), &Response::new(200, "old rates")).await.unwrap();
        fetcher.respond(&cdn("/api/rates").url, Response::new(500, "boom"));

        let strategy = NetworkFirst::new(context(store.clone(), fetcher));
        strategy.serve(cdn("/api/rates")).await.unwrap();

        let stored = store.match_request(GENERATION, &cdn("/api/rates")).await.unwrap().unwrap();
        assert_eq!(stored.body, "old rates".as_bytes());
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_cache() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        seed_offline_page(store.as_ref()).await;
        store.put(GENERATION, &cdn("/chart.js"), &Response::new(200, "cached chart")).await.unwrap();
        fetcher.set_offline(true);

        let strategy = NetworkFirst::new(context(store, fetcher));
        let response = strategy.serve(cdn("/chart.js")).await.unwrap();

        assert_eq!(response.body, "cached chart".as_bytes());
    }

    #[tokio::test]
    async fn test_failure_without_cache_returns_offline_page() {
        let store = Arc::new(MemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        seed_offline_page(store.as_ref()).await;
        fetcher.set_offline(true);

        let strategy = NetworkFirst::new(context(store, fetcher));
        let response = strategy.serve(cdn("/never-seen.js")).await.unwrap();

        assert_eq!(response.body, "offline".as_bytes());
    }

    #[tokio::test]
    async fn test_failure_without_fallback_errors() {
        let fetcher = ScriptedFetcher::new();
        fetcher.set_offline(true);

        let strategy = NetworkFirst::new(context(Arc::new(MemoryStore::new()), fetcher));
        let result = strategy.serve(cdn("/never-seen.js")).await;

        assert!(matches!(result, Err(Error::OfflineFallbackMissing(_))));
    }
}
