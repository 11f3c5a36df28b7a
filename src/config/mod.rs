//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, FeedSection, LoggingSection, StoreBackend, StoreSection, load_config,
    STORE_PATH_ENV,
};
