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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Realtime server URL must use ws:// or wss://")]
    InvalidRealtimeUrl,

    #[error("API base URL must use http:// or https://")]
    InvalidApiUrl,

    #[error("{0} must use a secure scheme in production")]
    InsecureScheme(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Heartbeat interval must be between 1 and 300 seconds")]
    InvalidHeartbeat,

    #[error("Reconnect base delay exceeds max delay")]
    InvalidBackoff,

    #[error("Notification capacity must be greater than zero")]
    InvalidCapacity,

    #[error("Page size must be between 1 and 100")]
    InvalidPageSize,

    #[error("Max pages must be greater than zero")]
    InvalidMaxPages,
}
