//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SAFEGUARD` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use safeguard_realtime::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Push server: {}", config.realtime.server_url);
//! ```

mod api;
mod environment;
mod error;
mod features;
mod notifications;
mod realtime;

pub use api::ApiConfig;
pub use environment::Environment;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use notifications::NotificationsConfig;
pub use realtime::{RealtimeConfig, ReconnectConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Tracing filter directive
    #[serde(default = "environment::default_log_level")]
    pub log_level: String,

    /// Push connection (server URL, heartbeat, reconnection)
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// REST backend for the notification bootstrap
    #[serde(default)]
    pub api: ApiConfig,

    /// Notification store limits and adapter placeholders
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAFEGUARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAFEGUARD__REALTIME__SERVER_URL=wss://...` -> `realtime.server_url`
    /// - `SAFEGUARD__REALTIME__RECONNECT__MAX_ATTEMPTS=8` -> `realtime.reconnect.max_attempts`
    /// - `SAFEGUARD__FEATURES__ENABLE_REALTIME=false` -> `features.enable_realtime`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAFEGUARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL schemes (secure schemes required in production)
    /// - Backoff and timeout bounds
    /// - Store capacity and page size
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.realtime.validate(self.environment)?;
        self.api.validate(self.environment)?;
        self.notifications.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: environment::default_log_level(),
            realtime: RealtimeConfig::default(),
            api: ApiConfig::default(),
            notifications: NotificationsConfig::default(),
            features: FeatureFlags::default(),
        }
    }
}
