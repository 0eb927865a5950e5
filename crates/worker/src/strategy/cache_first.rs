//! Cache-first with background refresh, for same-origin requests.

use ppi_core::{Error, Request, Response};

use super::StrategyContext;

/// Serve from cache when possible and refresh the entry behind the caller.
#[derive(Debug, Clone)]
pub struct CacheFirst {
    ctx: StrategyContext,
}

impl CacheFirst {
    pub fn new(ctx: StrategyContext) -> Self {
        Self { ctx }
    }

    /// Answer `request`.
    ///
    /// The network fetch always starts, on its own task. On a cache hit the
    /// task is detached and the cached snapshot returns immediately; the
    /// task keeps running after this request is done and only updates the
    /// cache. On a miss the same fetch is awaited, falling back to the
    /// offline page if it fails.
    pub async fn serve(&self, request: Request) -> Result<Response, Error> {
        let cached = self.ctx.lookup(&request).await;

        let refresh = tokio::spawn(refresh(self.ctx.clone(), request.clone()));

        if let Some(response) = cached {
            tracing::debug!(url = %request.url, "cache hit");
            return Ok(response);
        }

        tracing::debug!(url = %request.url, "cache miss; waiting on network");
        match refresh.await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => self.ctx.offline_fallback().await,
            Err(join_err) => {
                tracing::warn!(url = %request.url, error = %join_err, "network task aborted");
                self.ctx.offline_fallback().await
            }
        }
    }
}

async fn refresh(ctx: StrategyContext, request: Request) -> Result<Response, Error> {
    match ctx.fetcher.fetch(&request).await {
        Ok(response) => {
            ctx.store_if_ok(&request, &response).await;
            Ok(response)
        }
        Err(e) if e.is_network() => {
            tracing::debug!(url = %request.url, error = %e, "network fetch failed");
            Err(e)
        }
        Err(e) => {
            tracing::warn!(url = %request.url, error = %e, "fetch rejected request");
            Err(e)
        }
    }
}
