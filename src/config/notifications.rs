//! Notification store configuration

use serde::Deserialize;

use crate::domain::notification::{DedupPolicy, IdStrategy, Placeholders};

use super::error::ValidationError;

/// Notification store and adapter settings
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum entries kept; the oldest is evicted beyond this
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Window within which content-equal notifications are one
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: i64,

    /// How IDs are synthesized for payloads without one
    #[serde(default)]
    pub id_strategy: IdStrategy,

    #[serde(default = "default_untitled")]
    pub untitled_placeholder: String,

    #[serde(default = "default_unknown_actor")]
    pub unknown_actor_placeholder: String,
}

impl NotificationsConfig {
    pub fn dedup_policy(&self) -> DedupPolicy {
        DedupPolicy::default()
            .with_capacity(self.capacity)
            .with_window_millis(self.dedup_window_ms)
    }

    pub fn placeholders(&self) -> Placeholders {
        Placeholders {
            untitled: self.untitled_placeholder.clone(),
            unknown_actor: self.unknown_actor_placeholder.clone(),
        }
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == 0 {
            return Err(ValidationError::InvalidCapacity);
        }
        if self.untitled_placeholder.trim().is_empty() {
            return Err(ValidationError::MissingRequired(
                "NOTIFICATIONS__UNTITLED_PLACEHOLDER",
            ));
        }
        if self.unknown_actor_placeholder.trim().is_empty() {
            return Err(ValidationError::MissingRequired(
                "NOTIFICATIONS__UNKNOWN_ACTOR_PLACEHOLDER",
            ));
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            dedup_window_ms: default_dedup_window_ms(),
            id_strategy: IdStrategy::default(),
            untitled_placeholder: default_untitled(),
            unknown_actor_placeholder: default_unknown_actor(),
        }
    }
}

fn default_capacity() -> usize {
    50
}

fn default_dedup_window_ms() -> i64 {
    5000
}

fn default_untitled() -> String {
    "Untitled".to_string()
}

fn default_unknown_actor() -> String {
    "Someone".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_config_defaults() {
        let config = NotificationsConfig::default();
        assert_eq!(config.dedup_policy(), DedupPolicy::default());
        assert_eq!(config.placeholders(), Placeholders::default());
        assert_eq!(config.id_strategy, IdStrategy::Timestamped);
    }

    #[test]
    fn test_id_strategy_deserialization() {
        let config: NotificationsConfig =
            serde_json::from_str(r#"{"id_strategy": "entity_scoped"}"#).unwrap();
        assert_eq!(config.id_strategy, IdStrategy::EntityScoped);
    }

    #[test]
    fn test_validation_zero_capacity() {
        let config = NotificationsConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCapacity));
    }
}
