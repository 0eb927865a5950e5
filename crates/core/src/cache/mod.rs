//! Versioned response cache.
//!
//! The cache is a set of named generations, each mapping request identities
//! to response snapshots. Callers never touch storage directly; they receive
//! a [`CacheStore`] and go through it. Two backends are provided:
//!
//! - [`CacheDb`]: SQLite via tokio-rusqlite, WAL mode, schema migrations
//! - [`MemoryStore`]: a process-local map, used by tests and ephemeral runs

pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryStore;
pub use store::CacheStore;
