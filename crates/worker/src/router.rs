//! Request classification.
//!
//! Pure and synchronous: looks only at the request and the worker's origin,
//! touches no storage and no network.

use ppi_client::{excluded_scheme, is_interceptable_scheme, is_placeholder_host, same_origin};
use ppi_core::Request;
use url::Url;

/// Why a request is left to the network untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassReason {
    /// Anything but GET; side-effecting requests are never cached.
    NonGet(String),
    /// Extension, inline or browser-internal scheme.
    ExcludedScheme(String),
    /// Reserved `invalid` host.
    PlaceholderHost(String),
}

/// Dispatch decision for one intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    PassThrough(PassReason),
    CacheFirst,
    NetworkFirst,
}

/// Classify a request relative to the worker's own origin.
pub fn classify(request: &Request, origin: &Url) -> Route {
    if !request.is_get() {
        return Route::PassThrough(PassReason::NonGet(request.method.clone()));
    }

    if let Some(scheme) = excluded_scheme(&request.url) {
        return Route::PassThrough(PassReason::ExcludedScheme(scheme.to_string()));
    }

    // Unlisted schemes are not fetchable either.
    if !is_interceptable_scheme(&request.url) {
        return Route::PassThrough(PassReason::ExcludedScheme(request.url.scheme().to_string()));
    }

    if is_placeholder_host(&request.url) {
        let host = request.url.host_str().unwrap_or_default().to_string();
        return Route::PassThrough(PassReason::PlaceholderHost(host));
    }

    if same_origin(&request.url, origin) { Route::CacheFirst } else { Route::NetworkFirst }
}
