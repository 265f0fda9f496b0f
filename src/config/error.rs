//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid host/port combination: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Completion base URL must be http(s)")]
    InvalidBaseUrl,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("max_tokens must be between 1 and 4096")]
    InvalidMaxTokens,

    #[error("Completion timeout must be between 1 and 120 seconds")]
    InvalidCompletionTimeout,

    #[error(
        "Request timeout ({request_secs}s) must exceed the completion timeout ({completion_secs}s)"
    )]
    RequestTimeoutNotAboveCompletion { request_secs: u64, completion_secs: u64 },

    #[error("A database is required in production")]
    DatabaseRequiredInProduction,
}
