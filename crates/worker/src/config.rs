//! Resolved settings for one worker instance.

use ppi_client::{UrlError, resolve};
use ppi_core::{AppConfig, Error};
use url::Url;

/// Everything the cache manager needs, with manifest paths already resolved
/// against the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// The running context's own origin.
    pub origin: Url,
    /// Label of the current cache generation.
    pub cache_version: String,
    /// Seed manifest, in install order.
    pub manifest: Vec<Url>,
    /// Terminal fallback resource.
    pub offline_url: Url,
}

fn invalid_url(path: &str, err: UrlError) -> Error {
    Error::InvalidUrl(format!("{path}: {err}"))
}

impl WorkerConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.origin)))?;

        let manifest = config
            .seed_manifest()
            .iter()
            .map(|path| resolve(&origin, path).map_err(|e| invalid_url(path, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let offline_url = resolve(&origin, &config.offline_page).map_err(|e| invalid_url(&config.offline_page, e))?;

        Ok(Self { origin, cache_version: config.cache_version.clone(), manifest, offline_url })
    }
}
