//! Notification entity and its classification enums.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp};

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationType {
    /// Parses a wire value, falling back to `Info` for anything unknown.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => Self::Warning,
            "error" | "danger" => Self::Error,
            "success" => Self::Success,
            _ => Self::Info,
        }
    }
}

/// Grouping used for routing and filtering in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    System,
    Training,
    Safety,
    Ppe,
    Project,
    User,
    #[default]
    General,
}

impl NotificationCategory {
    /// Parses a wire value, falling back to `General` for anything unknown.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "system" => Self::System,
            "training" => Self::Training,
            "safety" | "incident" => Self::Safety,
            "ppe" => Self::Ppe,
            "project" => Self::Project,
            "user" => Self::User,
            _ => Self::General,
        }
    }
}

/// Sort and emphasis hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    /// Parses a wire value, falling back to `Medium` for anything unknown.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" | "critical" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

/// A user-visible unit of realtime information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: NotificationCategory,
    pub priority: NotificationPriority,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default)]
    pub is_read: bool,
}

impl Notification {
    /// Creates an unread `info`/`general`/`medium` notification stamped now.
    pub fn new(
        id: impl Into<NotificationId>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            kind: NotificationType::default(),
            category: NotificationCategory::default(),
            priority: NotificationPriority::default(),
            created_at: Timestamp::now(),
            action_url: None,
            is_read: false,
        }
    }

    pub fn with_kind(mut self, kind: NotificationType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_category(mut self, category: NotificationCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// True when `other` describes the same logical content.
    pub fn same_content_as(&self, other: &Notification) -> bool {
        self.category == other.category && self.title == other.title && self.message == other.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let n = Notification::new("n-1", "Title", "Body")
            .with_kind(NotificationType::Warning)
            .with_category(NotificationCategory::Ppe);

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["category"], "ppe");
        assert_eq!(json["isRead"], false);
        assert!(json.get("actionUrl").is_none());
    }

    #[test]
    fn lenient_parsers_fall_back_to_defaults() {
        assert_eq!(NotificationType::parse_lenient("WARNING"), NotificationType::Warning);
        assert_eq!(NotificationType::parse_lenient("sparkly"), NotificationType::Info);
        assert_eq!(NotificationCategory::parse_lenient("incident"), NotificationCategory::Safety);
        assert_eq!(NotificationCategory::parse_lenient(""), NotificationCategory::General);
        assert_eq!(NotificationPriority::parse_lenient("critical"), NotificationPriority::Urgent);
        assert_eq!(NotificationPriority::parse_lenient("meh"), NotificationPriority::Medium);
    }

    #[test]
    fn same_content_ignores_id_and_time() {
        let a = Notification::new("a", "T", "M");
        let b = Notification::new("b", "T", "M").read(true);
        let c = Notification::new("c", "T", "M").with_category(NotificationCategory::Safety);

        assert!(a.same_content_as(&b));
        assert!(!a.same_content_as(&c));
    }
}
