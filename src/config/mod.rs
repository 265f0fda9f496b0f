//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FITNESS_COACH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use fitness_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.port);
//! ```

mod ai;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// PostgreSQL transcript store; in-memory when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FITNESS_COACH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FITNESS_COACH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FITNESS_COACH__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `FITNESS_COACH__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Like [`AppConfig::load`] but without reading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FITNESS_COACH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, if the
    /// request timeout does not exceed the completion timeout, or if
    /// production runs without a database.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        // The HTTP layer timeout must fire after the completion timeout.
        if self.server.request_timeout_secs <= self.ai.timeout_secs {
            return Err(ValidationError::RequestTimeoutNotAboveCompletion {
                request_secs: self.server.request_timeout_secs,
                completion_secs: self.ai.timeout_secs,
            });
        }
        match &self.database {
            Some(database) => database.validate()?,
            None if self.is_production() => {
                return Err(ValidationError::DatabaseRequiredInProduction)
            }
            None => {}
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
