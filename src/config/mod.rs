//! Configuration management for tautulli-relay
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tautulli_relay::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `RELAY__<section>__<key>`
//!
//! Examples:
//! - `RELAY__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `RELAY__UPSTREAM__TIMEOUT_SECS=5`
//! - `RELAY__STORAGE__PATH=/var/lib/tautulli-relay`
//!
//! The deployment variables `TAUTULLI_BASE_URL`, `TAUTULLI_API_KEY` and
//! `TAUTULLI_API_PORT` are applied last. The API key is never read from TOML.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/tautulli-relay.toml`.
//! This can be overridden using the `RELAY_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, ServerConfig, StorageConfig, StorageProvider, UpstreamConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed, a deployment
    /// variable cannot be parsed, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        if config.upstream.api_key.is_none() {
            tracing::warn!("TAUTULLI_API_KEY is not set, upstream requests will be rejected");
        }
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Effective configuration rendered as TOML. The API key is omitted.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
