//! Core types and shared functionality for ppi-offline.
//!
//! This crate provides:
//! - Request/response snapshots shared by every layer
//! - The cache store capability with SQLite and in-memory backends
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheDb, CacheStore, MemoryStore};
pub use config::{AppConfig, ConfigError, StorageBackend};
pub use error::Error;
pub use http::{Request, Response};
