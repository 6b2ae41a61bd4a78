//! Store configuration.
//!
//! Settings come from an optional TOML file and then the environment, with
//! the environment winning:
//!
//! ```toml
//! [store]
//! url = "https://project.supabase.co"
//! service_key = "..."
//! table = "company_profiles"
//! timeout_secs = 30
//! ```
//!
//! The service key grants write access that bypasses row-level security. It
//! is redacted from `Debug` output and never logged.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the project URL.
pub const URL_ENV: &str = "SUPABASE_URL";

/// Fallback environment variable for the project URL.
pub const PUBLIC_URL_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL";

/// Environment variable holding the service role key.
pub const SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Table holding company profiles.
pub const DEFAULT_TABLE: &str = "company_profiles";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the profile store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base project URL, without a trailing slash.
    pub url: String,

    /// Service role key.
    pub service_key: String,

    /// Table holding company profiles.
    pub table: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    store: PartialStoreConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PartialStoreConfig {
    url: Option<String>,
    service_key: Option<String>,
    table: Option<String>,
    timeout_secs: Option<u64>,
}

impl StoreConfig {
    /// Build a configuration directly.
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from an optional TOML file, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Load from an optional TOML file, then variables from `env`.
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut partial = match file {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                toml::from_str::<FileConfig>(&text)?.store
            }
            None => PartialStoreConfig::default(),
        };

        let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(URL_ENV).or_else(|| non_empty(PUBLIC_URL_ENV)) {
            partial.url = Some(url);
        }
        if let Some(key) = non_empty(SERVICE_KEY_ENV) {
            partial.service_key = Some(key);
        }

        let url = partial.url.filter(|v| !v.trim().is_empty());
        let service_key = partial.service_key.filter(|v| !v.trim().is_empty());
        let (url, service_key) = match (url, service_key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(URL_ENV);
                }
                if key.is_none() {
                    missing.push(SERVICE_KEY_ENV);
                }
                return Err(Error::Config(format!(
                    "Missing Supabase credentials: {}",
                    missing.join(", ")
                )));
            }
        };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "store url must start with http:// or https://, got '{url}'"
            )));
        }

        let mut config = Self::new(url, service_key);
        if let Some(table) = partial.table.filter(|t| !t.is_empty()) {
            config.table = table;
        }
        if let Some(timeout) = partial.timeout_secs {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// REST endpoint for the configured table.
    pub fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
