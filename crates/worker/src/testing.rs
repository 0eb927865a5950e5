//! Test doubles for the injected capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ppi_client::Fetcher;
use ppi_core::{CacheStore, Error, MemoryStore, Request, Response};
use tokio::sync::Notify;
use url::Url;

use crate::strategy::StrategyContext;

pub const ORIGIN: &str = "http://localhost:3000";
pub const GENERATION: &str = "ei-ppi-cache-v1";

pub fn app_url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

pub fn get(path: &str) -> Request {
    Request::get(app_url(path))
}

/// Network fake answering from a fixed script.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Response>>,
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &Url, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Hold every fetch until the returned handle is notified.
    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let url = request.cache_url().to_string();
        self.calls.lock().unwrap().push(url.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{url}: connection refused")));
        }

        let found = self.routes.lock().unwrap().get(&url).cloned();
        found.ok_or_else(|| Error::Network(format!("{url}: dns error")))
    }
}

/// Store that fails selected operations.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// Deletes of this generation fail.
    pub fail_delete_on: Option<String>,
    /// Puts of this URL path fail.
    pub fail_put_on: Option<String>,
    /// Every lookup fails.
    pub fail_reads: bool,
}

#[async_trait]
impl CacheStore for FaultyStore {
    async fn open(&self, generation: &str) -> Result<(), Error> {
        self.inner.open(generation).await
    }

    async fn generations(&self) -> Result<Vec<String>, Error> {
        self.inner.generations().await
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, Error> {
        if self.fail_delete_on.as_deref() == Some(generation) {
            return Err(Error::InvalidState(format!("{generation} is locked")));
        }
        self.inner.delete_generation(generation).await
    }

    async fn match_request(&self, generation: &str, request: &Request) -> Result<Option<Response>, Error> {
        if self.fail_reads {
            return Err(Error::CorruptEntry("database disk image is malformed".into()));
        }
        self.inner.match_request(generation, request).await
    }

    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error> {
        if self.fail_put_on.as_deref() == Some(request.url.path()) {
            return Err(Error::InvalidState(format!("{generation} is read-only")));
        }
        self.inner.put(generation, request, response).await
    }

    async fn cached_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        self.inner.cached_urls(generation).await
    }
}

pub fn context(store: Arc<dyn CacheStore>, fetcher: Arc<dyn Fetcher>) -> StrategyContext {
    StrategyContext::new(store, fetcher, GENERATION, app_url("/offline.html"))
}

/// Seed the offline page into the test generation.
pub async fn seed_offline_page(store: &dyn CacheStore) {
    store
        .put(GENERATION, &get("/offline.html"), &Response::new(200, "offline"))
        .await
        .unwrap();
}

/// Poll until the stored body for `path` equals `expected`.
pub async fn wait_for_body(store: &dyn CacheStore, path: &str, expected: &str) -> bool {
    for _ in 0..500 {
        if let Ok(Some(found)) = store.match_request(GENERATION, &get(path)).await
            && found.body == expected.as_bytes()
        {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    false
}
