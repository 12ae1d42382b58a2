//! Realtime push connection configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::connection::ReconnectPolicy;

use super::environment::Environment;
use super::error::ValidationError;

/// Push server connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Push server URL (ws:// or wss://)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Keep-alive ping interval in seconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Handshake timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Reconnection policy
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Reconnection backoff settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Keep retrying after the server rejects the token
    #[serde(default)]
    pub retry_on_auth_failure: bool,
}

impl RealtimeConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.reconnect.max_attempts,
            base_delay: Duration::from_millis(self.reconnect.base_delay_ms),
            max_delay: Duration::from_millis(self.reconnect.max_delay_ms),
            retry_on_auth_failure: self.reconnect.retry_on_auth_failure,
        }
    }

    /// Validate realtime configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.server_url.is_empty() {
            return Err(ValidationError::MissingRequired("REALTIME__SERVER_URL"));
        }
        let secure = self.server_url.starts_with("wss://");
        if !secure && !self.server_url.starts_with("ws://") {
            return Err(ValidationError::InvalidRealtimeUrl);
        }
        if environment.is_production() && !secure {
            return Err(ValidationError::InsecureScheme("Realtime server URL"));
        }
        if self.heartbeat_interval_secs == 0 || self.heartbeat_interval_secs > 300 {
            return Err(ValidationError::InvalidHeartbeat);
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.reconnect.base_delay_ms > self.reconnect.max_delay_ms {
            return Err(ValidationError::InvalidBackoff);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            connect_timeout_secs: default_connect_timeout(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            retry_on_auth_failure: false,
        }
    }
}

fn default_server_url() -> String {
    "ws://localhost:5000/ws".to_string()
}

fn default_heartbeat_interval() -> u64 {
    25
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    5000
}
