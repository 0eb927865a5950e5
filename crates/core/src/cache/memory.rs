//! In-memory cache store.
//!
//! Uses a HashMap per generation behind a tokio RwLock. Nothing survives the
//! process; useful for tests and for hosts that persist nothing.

use std::collections::{HashMap, hash_map};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{CacheStore, check_cacheable};
use crate::{Error, Request, Response};

#[derive(Default)]
struct Generation {
    /// Identity -> (url, response).
    entries: HashMap<String, (String, Response)>,
    /// Identities in first-insertion order.
    order: Vec<String>,
}

/// Process-local cache store. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    generations: Arc<RwLock<HashMap<String, Generation>>>,
    order: Arc<RwLock<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn ensure(&self, generation: &str) {
        let mut generations = self.generations.write().await;
        if !generations.contains_key(generation) {
            generations.insert(generation.to_string(), Generation::default());
            self.order.write().await.push(generation.to_string());
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, generation: &str) -> Result<(), Error> {
        self.ensure(generation).await;
        Ok(())
    }

    async fn generations(&self) -> Result<Vec<String>, Error> {
        Ok(self.order.read().await.clone())
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, Error> {
        let mut generations = self.generations.write().await;
        let existed = generations.remove(generation).is_some();
        if existed {
            self.order.write().await.retain(|name| name != generation);
        }
        Ok(existed)
    }

    async fn match_request(&self, generation: &str, request: &Request) -> Result<Option<Response>, Error> {
        let generations = self.generations.read().await;
        Ok(generations
            .get(generation)
            .and_then(|g| g.entries.get(&request.identity()))
            .map(|(_, response)| response.clone()))
    }

    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error> {
        check_cacheable(request, response)?;

        let identity = request.identity();
        let mut generations = self.generations.write().await;
        let entry = match generations.entry(generation.to_string()) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => {
                self.order.write().await.push(generation.to_string());
                slot.insert(Generation::default())
            }
        };
        let previous = entry
            .entries
            .insert(identity.clone(), (request.cache_url().to_string(), response.clone()));
        if previous.is_none() {
            entry.order.push(identity);
        }
        Ok(())
    }

    async fn cached_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        let generations = self.generations.read().await;
        let Some(entry) = generations.get(generation) else {
            return Ok(Vec::new());
        };
        Ok(entry
            .order
            .iter()
            .filter_map(|identity| entry.entries.get(identity).map(|(url, _)| url.clone()))
            .collect())
    }
}
