//! Request and response snapshots.
//!
//! These are the values that flow between the router, the strategies, the
//! network capability and the cache store. A [`Response`] is an immutable
//! snapshot: cloning it shares the body buffer, and storing a fresher one for
//! the same request identity replaces the old snapshot outright.

use bytes::Bytes;
use url::Url;

/// An intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self { method: method.into(), url, headers: Vec::new() }
    }

    /// Build a plain GET request.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// URL with the fragment removed; fragments never reach the network.
    pub fn cache_url(&self) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url
    }

    /// Request identity used as the cache key: method plus URL.
    pub fn identity(&self) -> String {
        format!("{} {}", self.method.to_ascii_uppercase(), self.cache_url())
    }
}

/// A response snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True for the 2xx status class.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_strips_fragment() {
        let req = Request::get(Url::parse("https://example.com/index.html#top").unwrap());
        assert_eq!(req.identity(), "GET https://example.com/index.html");
    }

    #[test]
    fn test_identity_normalizes_method_case() {
        let req = Request::new("get", Url::parse("https://example.com/").unwrap());
        assert!(req.is_get());
        assert_eq!(req.identity(), "GET https://example.com/");
    }

    #[test]
    fn test_identity_keeps_query() {
        let req = Request::get(Url::parse("https://example.com/styles.css?v=20250427_9").unwrap());
        assert_eq!(req.identity(), "GET https://example.com/styles.css?v=20250427_9");
    }

    #[test]
    fn test_post_is_not_get() {
        let req = Request::new("POST", Url::parse("https://example.com/api").unwrap());
        assert!(!req.is_get());
    }

    #[test]
    fn test_response_ok_class() {
        assert!(Response::new(200, "").is_ok());
        assert!(Response::new(204, "").is_ok());
        assert!(!Response::new(304, "").is_ok());
        assert!(!Response::new(404, "").is_ok());
        assert!(!Response::new(500, "").is_ok());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let resp = Response::new(200, "body").with_header("Content-Type", "text/html");
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.header("etag"), None);
    }
}
