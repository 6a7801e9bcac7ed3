//! Service configuration.
//!
//! Loaded once at start-up from a JSON file. Secrets never live in the file;
//! they come from the environment via [`Secrets`].

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::domain::StopConfig;
use crate::mbta::MbtaConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has the wrong shape
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but is unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Credentials taken from the environment.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// Sent upstream as `x-api-key`.
    pub mbta_api_key: Option<String>,
    /// Required in `X-API-Key` on `/v1/*` when set.
    pub api_key: Option<String>,
}

impl Secrets {
    /// Read `MBTA_API_KEY` and `API_KEY`. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            mbta_api_key: non_empty_env("MBTA_API_KEY"),
            api_key: non_empty_env("API_KEY"),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Validated, immutable service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mbta_base_url: String,
    /// Fresh TTL in seconds.
    pub cache_ttl: u64,
    /// Stale grace window in seconds.
    pub stale_max_age: u64,
    pub bind_addr: SocketAddr,
    pub request_timeout_secs: u64,
    /// Upper bound on MBTA requests in flight at once.
    pub max_concurrent_requests: usize,
    /// Stops in display order.
    pub stops: Vec<StopConfig>,
    pub secrets: Secrets,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_base_url")]
    mbta_base_url: String,
    #[serde(default = "default_cache_ttl")]
    cache_ttl: u64,
    #[serde(default = "default_stale_max_age")]
    stale_max_age: u64,
    #[serde(default = "default_bind_addr")]
    bind_addr: SocketAddr,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
    #[serde(default = "default_max_concurrent")]
    max_concurrent_requests: usize,
    stops: Vec<StopConfig>,
}

fn default_base_url() -> String {
    crate::mbta::DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl() -> u64 {
    20
}

fn default_stale_max_age() -> u64 {
    300
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_request_timeout() -> u64 {
    crate::mbta::DEFAULT_TIMEOUT_SECS
}

fn default_max_concurrent() -> usize {
    crate::mbta::DEFAULT_MAX_CONCURRENT
}

impl AppConfig {
    /// Load and validate the config file at `path`.
    pub fn load(path: impl AsRef<Path>, secrets: Secrets) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents, secrets)
    }

    /// Parse and validate config from a JSON string.
    pub fn from_json_str(json: &str, secrets: Secrets) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        validate(&raw)?;

        Ok(Self {
            mbta_base_url: raw.mbta_base_url,
            cache_ttl: raw.cache_ttl,
            stale_max_age: raw.stale_max_age,
            bind_addr: raw.bind_addr,
            request_timeout_secs: raw.request_timeout_secs,
            max_concurrent_requests: raw.max_concurrent_requests,
            stops: raw.stops,
            secrets,
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            fresh_ttl: Duration::from_secs(self.cache_ttl),
            stale_max_age: Duration::from_secs(self.stale_max_age),
        }
    }

    pub fn mbta_config(&self) -> MbtaConfig {
        let config = MbtaConfig::new()
            .with_base_url(&self.mbta_base_url)
            .with_timeout(self.request_timeout_secs)
            .with_max_concurrent(self.max_concurrent_requests);
        match &self.secrets.mbta_api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}

fn validate(raw: &RawConfig) -> Result<(), ConfigError> {
    if raw.stops.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one stop must be configured".to_string(),
        ));
    }
    if raw.cache_ttl < 1 {
        return Err(ConfigError::Invalid("cache_ttl must be at least 1".to_string()));
    }
    if raw.max_concurrent_requests < 1 {
        return Err(ConfigError::Invalid(
            "max_concurrent_requests must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for stop in &raw.stops {
        if !seen.insert(stop.key.as_str()) && !duplicates.contains(&stop.key.as_str()) {
            duplicates.push(&stop.key);
        }
    }
    if !duplicates.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "duplicate stop keys: {}",
            duplicates.join(", ")
        )));
    }

    Ok(())
}
