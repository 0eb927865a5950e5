//! Which requests the cache manager may intercept at all.
//!
//! Only http(s) requests to real hosts are fetchable. Extension, inline and
//! browser-internal schemes, and the reserved `.invalid` namespace, are left
//! to the platform.

use url::Url;

/// Schemes that are never fetched through the cache.
pub const EXCLUDED_SCHEMES: &[&str] = &[
    "chrome-extension",
    "moz-extension",
    "safari-extension",
    "file",
    "ftp",
    "data",
    "javascript",
    "chrome",
    "about",
    "blob",
    "ws",
    "wss",
];

/// The listed excluded scheme `url` uses, if any.
pub fn excluded_scheme(url: &Url) -> Option<&'static str> {
    EXCLUDED_SCHEMES.iter().copied().find(|scheme| *scheme == url.scheme())
}

/// True only for http and https.
pub fn is_interceptable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Whether the host is a reserved placeholder (`invalid` or `*.invalid`, RFC 6761).
pub fn is_placeholder_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.trim_end_matches('.').to_ascii_lowercase();
            host == "invalid" || host.ends_with(".invalid")
        }
        None => false,
    }
}
