//! Offline cache manager for the EI-PPI calculator.
//!
//! The manager owns one versioned cache generation and answers intercepted
//! requests from it:
//!
//! - [`lifecycle`]: install seeds the generation from a fixed manifest;
//!   activate deletes every other generation.
//! - [`router`]: decides per request whether to intervene and how.
//! - [`strategy`]: cache-first with background refresh for same-origin
//!   requests, network-first with cache fallback for cross-origin ones.
//! - [`worker`]: the [`ServiceWorker`] surface a host adapter drives.
//!
//! Storage and network are injected as [`ppi_core::CacheStore`] and
//! [`ppi_client::Fetcher`], so tests run against in-memory fakes.

pub mod config;
pub mod lifecycle;
pub mod router;
pub mod strategy;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use config::WorkerConfig;
pub use lifecycle::{ActivateOutcome, InstallOutcome, Lifecycle, WorkerState};
pub use router::{PassReason, Route, classify};
pub use strategy::{CacheFirst, NetworkFirst, StrategyContext};
pub use worker::{OfflineWorker, ResponseFuture, ServiceWorker};
