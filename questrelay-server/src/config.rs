use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{DEFAULT_CACHE_KEY, DEFAULT_FRESHNESS_WINDOW_SECS, FetcherConfig, RelayError};
use crate::persistence::StoreBackend;
use crate::upstream::DEFAULT_BASE_URL;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: Server,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Discord user token. Usually supplied through `DISCORD_TOKEN` rather than the file.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Request timeout; unset means the upstream call may wait indefinitely
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub key: String,
    pub freshness_window_secs: u64,
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub warm_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CACHE_KEY.to_string(),
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            backend: StoreBackend::File,
            data_dir: PathBuf::from("./data"),
            warm_on_startup: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ServerConfig = serde_yaml::from_str(&content)?;
        config.freshness_window()?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Numbers that fail to parse or overflow keep the current value.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.upstream.token = Some(token);
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }

        if let Some(secs) = lookup("CACHE_DURATION_MINUTES")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .and_then(|minutes| minutes.checked_mul(60))
        {
            self.cache.freshness_window_secs = secs;
        }

        if let Some(dir) = lookup("QUESTRELAY_DATA_DIR") {
            self.cache.data_dir = PathBuf::from(dir);
        }
    }

    /// Freshness window as a duration, rejecting values chrono cannot represent
    pub fn freshness_window(&self) -> Result<chrono::Duration, RelayError> {
        let secs = self.cache.freshness_window_secs;
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                RelayError::Config(format!("cache.freshness_window_secs out of range: {}", secs))
            })
    }

    /// Build the fetcher settings
    pub fn to_fetcher_config(&self) -> Result<FetcherConfig, RelayError> {
        Ok(FetcherConfig {
            token: self.upstream.token.clone(),
            freshness_window: self.freshness_window()?,
            cache_key: self.cache.key.clone(),
        })
    }

    /// Upstream request timeout, if configured
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream.timeout_secs.map(Duration::from_secs)
    }

    /// Whether a non-blank credential is configured
    pub fn has_token(&self) -> bool {
        self.upstream
            .token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Get server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
