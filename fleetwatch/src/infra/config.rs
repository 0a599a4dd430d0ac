use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_URL_ENV: &str = "FLEETWATCH_API_URL";
pub const PUSH_URL_ENV: &str = "FLEETWATCH_PUSH_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "FLEETWATCH_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Client settings. Later sources override earlier ones: defaults, the JSON
/// config file, then environment variables. CLI flags are applied on top by
/// the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the delivery REST API.
    pub api_url: String,
    /// Full URL of the server-sent events stream carrying position updates.
    pub push_url: String,
    pub request_timeout_secs: u64,
    /// Poll period for `drivers list --follow`.
    pub follow_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://admin-panel-albuhaira-alarabia.onrender.com"
                .to_string(),
            push_url: "http://localhost:6014/events".to_string(),
            request_timeout_secs: 30,
            follow_interval_secs: 30,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/fleetwatch/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fleetwatch").join("config.json"))
    }

    /// Load from the default file location (if any) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = serde_json::from_str(&content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup such as `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty())
        {
            self.api_url = url;
        }
        if let Some(url) = lookup(PUSH_URL_ENV).filter(|v| !v.trim().is_empty())
        {
            self.push_url = url;
        }
        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            self.request_timeout_secs = parse_secs(REQUEST_TIMEOUT_ENV, &raw)?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn follow_interval(&self) -> Duration {
        if self.follow_interval_secs == 0 {
            warn!("follow_interval_secs is 0, using 1s");
        }
        Duration::from_secs(self.follow_interval_secs.max(1))
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}
