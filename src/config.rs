//! Engine configuration.
//!
//! Loaded from a YAML file shipped next to the host deployment. Covers the
//! backend endpoint plus the two tunables: the debounce interval and the
//! response-cache TTL. A TTL of zero disables response caching (the uncached
//! live-preview policy).

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cascading-options backend.
    pub backend: BackendConfig,

    /// Debounce window for filter changes, in milliseconds (default: 200).
    /// Only the last change inside the window triggers a resolve.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Response-cache TTL in seconds (default: 120). Zero disables caching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_cache_ttl_secs() -> u64 {
    120
}

/// Backend endpoint configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the filter endpoints are joined under.
    pub base_url: String,

    /// Bearer token injected on every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds (default: 10). Expiry takes the same
    /// best-effort failure path as any other resolve failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            debounce_ms: default_debounce_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&contents)?)
    }

    /// Save configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml_ng::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
