//! The cache store capability.

use async_trait::async_trait;

use crate::{Error, Request, Response};

/// Storage for cache generations.
///
/// Each method is one atomic unit against the backing store. There are no
/// multi-step transactions; two `put`s racing on the same identity resolve
/// as last-write-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the generation if it does not exist yet.
    async fn open(&self, generation: &str) -> Result<(), Error>;

    /// Names of every generation currently stored.
    async fn generations(&self) -> Result<Vec<String>, Error>;

    /// Remove a generation with all its entries. Returns whether it existed.
    async fn delete_generation(&self, generation: &str) -> Result<bool, Error>;

    /// Look up the stored response for the request identity.
    async fn match_request(&self, generation: &str, request: &Request) -> Result<Option<Response>, Error>;

    /// Store `response` for the request identity, replacing any previous one.
    ///
    /// Creates the generation if needed. Only GET requests and non-partial
    /// responses can be stored.
    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error>;

    /// URLs stored in a generation, oldest insertion first.
    async fn cached_urls(&self, generation: &str) -> Result<Vec<String>, Error>;
}

/// Reject entries no backend may store.
pub(crate) fn check_cacheable(request: &Request, response: &Response) -> Result<(), Error> {
    if !request.is_get() {
        return Err(Error::InvalidInput(format!("cannot cache {} request", request.method)));
    }
    if response.status == 206 {
        return Err(Error::InvalidInput("cannot cache partial response (206)".into()));
    }
    Ok(())
}
