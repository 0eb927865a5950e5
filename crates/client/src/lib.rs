//! Client code for ppi-offline.
//!
//! This crate provides the network capability the cache manager fetches
//! through, plus the URL and scope rules the request router relies on.

pub mod fetch;

pub use fetch::{FetchConfig, Fetcher, HttpFetcher};
pub use fetch::scope::{EXCLUDED_SCHEMES, excluded_scheme, is_interceptable_scheme, is_placeholder_host};
pub use fetch::url::{UrlError, canonicalize, resolve, same_origin};
