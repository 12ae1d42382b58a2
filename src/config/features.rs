//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Open the push connection. When false the client is REST-only.
    #[serde(default = "default_true")]
    pub enable_realtime: bool,

    /// Let domain adapters write to the notification store
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_realtime: true,
            enable_notifications: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert!(flags.enable_realtime);
        assert!(flags.enable_notifications);
    }

    #[test]
    fn test_missing_flags_default_to_enabled() {
        let flags: FeatureFlags = serde_json::from_str("{}").unwrap();
        assert!(flags.enable_realtime);
        assert!(flags.enable_notifications);
    }

    #[test]
    fn test_feature_flags_deserialization() {
        let json = r#"{
            "enable_realtime": false,
            "enable_notifications": true
        }"#;

        let flags: FeatureFlags = serde_json::from_str(json).unwrap();
        assert!(!flags.enable_realtime);
        assert!(flags.enable_notifications);
    }
}
