//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analytics::AnalyticsConfig;
use crate::domain::{validate_value, ControlState};
use crate::ports::DEFAULT_RETENTION_CAP;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreSection,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub control: ControlState,
    pub logging: LoggingSection,
}

/// Which event store backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    JsonFile,
}

/// Event store configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    pub backend: StoreBackend,
    /// Event file for the json_file backend (supports ~)
    #[serde(default)]
    pub path: Option<String>,
    /// Maximum events retained, oldest evicted first
    #[serde(default = "default_retention_cap")]
    pub retention_cap: usize,
}

fn default_retention_cap() -> usize {
    DEFAULT_RETENTION_CAP
}

/// Environment variable overriding `store.path`
pub const STORE_PATH_ENV: &str = "VELA_STORE_PATH";

impl StoreSection {
    /// Get store path with environment variable override
    /// Checks VELA_STORE_PATH env var first, falls back to config value
    pub fn get_path(&self) -> Option<PathBuf> {
        self.resolve_path(std::env::var(STORE_PATH_ENV).ok())
    }

    /// Empty strings count as unset
    fn resolve_path(&self, env_override: Option<String>) -> Option<PathBuf> {
        let raw = env_override
            .filter(|p| !p.is_empty())
            .or_else(|| self.path.clone().filter(|p| !p.is_empty()))?;
        Some(PathBuf::from(shellexpand::tilde(&raw).to_string()))
    }
}

/// Feed loop configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSection {
    /// Dashboard polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Producer channel capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(std::env::var(STORE_PATH_ENV).ok())
    }

    fn validate_with(&self, store_path_override: Option<String>) -> Result<(), ConfigError> {
        if self.store.retention_cap == 0 {
            return Err(ConfigError::ValidationError(
                "retention_cap must be > 0".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::JsonFile
            && self.store.resolve_path(store_path_override).is_none()
        {
            return Err(ConfigError::ValidationError(format!(
                "path (or {}) is required for the json_file backend",
                STORE_PATH_ENV
            )));
        }

        if self.feed.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be > 0".to_string(),
            ));
        }

        if self.feed.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be > 0".to_string(),
            ));
        }

        self.analytics
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if let Some(value) = self.control.manual_override {
            validate_value(value).map_err(|e| {
                ConfigError::ValidationError(format!("manual_override: {}", e))
            })?;
        }

        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}
