//! Cache generation lifecycle: install and activate.
//!
//! ### Install
//! Fetches the whole seed manifest before writing anything. A transport
//! failure or a non-ok status on any entry fails the install and leaves the
//! store untouched; the host retries the whole install later. If a write
//! fails halfway into a generation this install created, the generation is
//! dropped so no partial generation is left behind. A generation that was
//! already stored keeps its entries.
//!
//! ### Activate
//! Deletes every generation except the current one. This is the only
//! eviction there is. Each delete stands alone: one failure is logged and
//! reported, the rest still run.
//!
//! Control of clients, once taken, survives later install attempts: a failed
//! re-install does not stop the stored generation from serving.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::try_join_all;
use ppi_client::Fetcher;
use ppi_core::{CacheStore, Error, Request, Response};
use tokio::sync::RwLock;

use crate::config::WorkerConfig;

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed; a new install attempt is required.
    Redundant,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub generation: String,
    /// URLs stored, in manifest order.
    pub cached: Vec<String>,
    /// Always true: the new generation does not wait for old clients.
    pub skip_waiting: bool,
}

/// Result of an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateOutcome {
    pub kept: String,
    pub deleted: Vec<String>,
    /// Stale generations whose delete failed.
    pub failed: Vec<String>,
    /// Always true: take over open clients immediately.
    pub claim_clients: bool,
}

/// Owns the current generation and its state transitions.
pub struct Lifecycle {
    config: WorkerConfig,
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
    controlling: AtomicBool,
}

impl Lifecycle {
    pub fn new(config: WorkerConfig, store: Arc<dyn CacheStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            store,
            fetcher,
            state: RwLock::new(WorkerState::Parsed),
            controlling: AtomicBool::new(false),
        }
    }

    /// Whether an activation has taken control of clients.
    pub fn controls_clients(&self) -> bool {
        self.controlling.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    pub fn generation(&self) -> &str {
        &self.config.cache_version
    }

    /// Seed the current generation from the manifest.
    pub async fn install(&self) -> Result<InstallOutcome, Error> {
        {
            let mut state = self.state.write().await;
            if matches!(*state, WorkerState::Installing | WorkerState::Activating) {
                return Err(Error::InvalidState(format!("cannot install while {}", *state)));
            }
            *state = WorkerState::Installing;
        }

        tracing::info!(
            generation = %self.config.cache_version,
            entries = self.config.manifest.len(),
            "installing cache generation"
        );

        match self.precache().await {
            Ok(cached) => {
                *self.state.write().await = WorkerState::Installed;
                tracing::info!(generation = %self.config.cache_version, cached = cached.len(), "install complete");
                Ok(InstallOutcome { generation: self.config.cache_version.clone(), cached, skip_waiting: true })
            }
            Err(e) => {
                let fallback =
                    if self.controls_clients() { WorkerState::Activated } else { WorkerState::Redundant };
                *self.state.write().await = fallback;
                tracing::warn!(
                    generation = %self.config.cache_version,
                    error = %e,
                    state = %fallback,
                    "install failed"
                );
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<Vec<String>, Error> {
        let fetched = try_join_all(self.config.manifest.iter().map(|url| async move {
            let request = Request::get(url.clone());
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed { url: url.to_string(), reason: e.to_string() })?;
            if !response.is_ok() {
                return Err(Error::InstallFailed {
                    url: url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok::<(Request, Response), Error>((request, response))
        }))
        .await?;

        let generation = &self.config.cache_version;
        let existed = self.store.generations().await?.iter().any(|name| name == generation);
        self.store.open(generation).await?;

        let mut cached = Vec::with_capacity(fetched.len());
        for (request, response) in &fetched {
            if let Err(e) = self.store.put(generation, request, response).await {
                if existed {
                    tracing::warn!(generation = %generation, error = %e, "write failed; keeping stored generation");
                } else {
                    self.rollback().await;
                }
                return Err(Error::InstallFailed { url: request.url.to_string(), reason: e.to_string() });
            }
            cached.push(request.url.to_string());
        }

        Ok(cached)
    }

    /// Drop a generation this install created.
    async fn rollback(&self) {
        let generation = &self.config.cache_version;
        if let Err(e) = self.store.delete_generation(generation).await {
            tracing::warn!(generation = %generation, error = %e, "failed to roll back partial install");
        }
    }

    /// Delete every generation but the current one.
    pub async fn activate(&self) -> Result<ActivateOutcome, Error> {
        let previous = {
            let mut state = self.state.write().await;
            let previous = *state;
            if !matches!(previous, WorkerState::Installed | WorkerState::Activated) {
                return Err(Error::InvalidState(format!("cannot activate while {previous}")));
            }
            *state = WorkerState::Activating;
            previous
        };

        let current = self.config.cache_version.clone();
        let generations = match self.store.generations().await {
            Ok(generations) => generations,
            Err(e) => {
                *self.state.write().await = previous;
                return Err(e);
            }
        };

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for name in generations.into_iter().filter(|name| *name != current) {
            match self.store.delete_generation(&name).await {
                Ok(true) => {
                    tracing::info!(generation = %name, "deleted stale cache generation");
                    deleted.push(name);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(generation = %name, error = %e, "failed to delete stale cache generation");
                    failed.push(name);
                }
            }
        }

        *self.state.write().await = WorkerState::Activated;
        self.controlling.store(true, Ordering::SeqCst);
        tracing::info!(generation = %current, deleted = deleted.len(), "activated; claiming clients");

        Ok(ActivateOutcome { kept: current, deleted, failed, claim_clients: true })
    }
}
