use std::path::PathBuf;
use std::time::Duration;

use holonet_core::CoreError;
use holonet_genai::DEFAULT_BACKEND_URL;
use holonet_swapi::DEFAULT_BASE_URL;

/// Explorer configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use against the public
/// catalog and a backend on loopback.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Catalog API root (default: `https://swapi.info/api`).
    pub catalog_base_url: String,
    /// Per-request catalog timeout (default: 10 s).
    pub catalog_timeout: Duration,
    /// Generation backend root (default: `http://localhost:8080`).
    pub backend_url: String,
    /// Directory holding the persisted favorites file (default: `.holonet`).
    pub favorites_dir: PathBuf,
    /// Search input debounce (default: 300 ms).
    pub search_debounce: Duration,
    /// First retry delay for transient query failures (default: 1 s).
    pub retry_base: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_BASE_URL.into(),
            catalog_timeout: Duration::from_secs(10),
            backend_url: DEFAULT_BACKEND_URL.into(),
            favorites_dir: PathBuf::from(".holonet"),
            search_debounce: Duration::from_millis(300),
            retry_base: Duration::from_millis(1000),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `CATALOG_BASE_URL`     | `https://swapi.info/api` |
    /// | `CATALOG_TIMEOUT_SECS` | `10`                     |
    /// | `BACKEND_URL`          | `http://localhost:8080`  |
    /// | `FAVORITES_DIR`        | `.holonet`               |
    /// | `SEARCH_DEBOUNCE_MS`   | `300`                    |
    /// | `QUERY_RETRY_BASE_MS`  | `1000`                   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let defaults = Self::default();

        let catalog_base_url = lookup("CATALOG_BASE_URL").unwrap_or(defaults.catalog_base_url);
        let backend_url = lookup("BACKEND_URL").unwrap_or(defaults.backend_url);
        let favorites_dir = lookup("FAVORITES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.favorites_dir);

        let catalog_timeout = Duration::from_secs(parse_u64(&lookup, "CATALOG_TIMEOUT_SECS", 10)?);
        let search_debounce = Duration::from_millis(parse_u64(&lookup, "SEARCH_DEBOUNCE_MS", 300)?);
        let retry_base = Duration::from_millis(parse_u64(&lookup, "QUERY_RETRY_BASE_MS", 1000)?);

        Ok(Self {
            catalog_base_url,
            catalog_timeout,
            backend_url,
            favorites_dir,
            search_debounce,
            retry_base,
        })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> Result<u64, CoreError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("{name} must be a valid u64, got {raw:?}"))),
    }
}
