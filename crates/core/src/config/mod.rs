//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PPI_OFFLINE_*)
//! 2. TOML config file (if PPI_OFFLINE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Placeholder replaced by `asset_version` in precache templates.
pub const ASSET_VERSION_PLACEHOLDER: &str = "{asset_version}";

/// Where cache generations are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PPI_OFFLINE_*)
/// 2. TOML config file (if PPI_OFFLINE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the application the cache serves.
    ///
    /// Set via PPI_OFFLINE_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Label of the current cache generation. Bumping it invalidates
    /// every previously cached entry on the next activation.
    ///
    /// Set via PPI_OFFLINE_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Cache-busting token the static server appends to the stylesheet.
    ///
    /// Set via PPI_OFFLINE_ASSET_VERSION environment variable.
    #[serde(default = "default_asset_version")]
    pub asset_version: String,

    /// Seed manifest paths; `{asset_version}` is expanded on load.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Page served when neither network nor cache can answer.
    ///
    /// Set via PPI_OFFLINE_OFFLINE_PAGE environment variable.
    #[serde(default = "default_offline_page")]
    pub offline_page: String,

    /// Storage backend for cache generations.
    ///
    /// Set via PPI_OFFLINE_STORAGE environment variable (`sqlite` or `memory`).
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// Path to SQLite cache database.
    ///
    /// Set via PPI_OFFLINE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via PPI_OFFLINE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via PPI_OFFLINE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via PPI_OFFLINE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_cache_version() -> String {
    "ei-ppi-cache-v1".into()
}

fn default_asset_version() -> String {
    "20250427_9".into()
}

fn default_precache() -> Vec<String> {
    vec![
        "/".into(),
        "/index.html".into(),
        format!("/styles.css?v={ASSET_VERSION_PLACEHOLDER}"),
        "/offline.html".into(),
    ]
}

fn default_offline_page() -> String {
    "/offline.html".into()
}

fn default_storage() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ppi-offline-cache.sqlite")
}

fn default_user_agent() -> String {
    "ppi-offline/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            cache_version: default_cache_version(),
            asset_version: default_asset_version(),
            precache: default_precache(),
            offline_page: default_offline_page(),
            storage: default_storage(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Seed manifest with `{asset_version}` expanded, in declaration order.
    pub fn seed_manifest(&self) -> Vec<String> {
        self.precache
            .iter()
            .map(|path| path.replace(ASSET_VERSION_PLACEHOLDER, &self.asset_version))
            .collect()
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PPI_OFFLINE_`
    /// 2. TOML file from `PPI_OFFLINE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PPI_OFFLINE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PPI_OFFLINE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.origin, "http://localhost:3000");
        assert_eq!(config.cache_version, "ei-ppi-cache-v1");
        assert_eq!(config.asset_version, "20250427_9");
        assert_eq!(config.offline_page, "/offline.html");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("./ppi-offline-cache.sqlite"));
        assert_eq!(config.user_agent, "ppi-offline/0.1");
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_seed_manifest_expands_asset_version() {
        let config = AppConfig::default();
        assert_eq!(
            config.seed_manifest(),
            vec!["/", "/index.html", "/styles.css?v=20250427_9", "/offline.html"]
        );
    }

    #[test]
    fn test_seed_manifest_follows_asset_version() {
        let config = AppConfig { asset_version: "20250501_1".into(), ..Default::default() };
        assert!(config.seed_manifest().contains(&"/styles.css?v=20250501_1".to_string()));
    }

    #[test]
    fn test_storage_backend_serde() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);
        assert_eq!(serde_json::to_string(&StorageBackend::Sqlite).unwrap(), "\"sqlite\"");
    }

    #[test]
    fn test_figment_layers_toml_over_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            r#"
            cache_version = "ei-ppi-cache-v2"
            storage = "memory"
            "#,
        ));
        let config: AppConfig = figment.extract().unwrap();
        assert_eq!(config.cache_version, "ei-ppi-cache-v2");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.offline_page, "/offline.html");
    }
}
