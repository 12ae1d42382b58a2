//! Mapping of server-shaped notification records into [`Notification`]s.
//!
//! The REST list endpoint and the `notification_created` push event share
//! this format. Missing fields get defaults rather than failing the record.

use serde_json::Value as JsonValue;

use crate::domain::foundation::{NotificationId, PayloadReader, Timestamp};

use super::{Notification, NotificationCategory, NotificationPriority, NotificationType};

/// Display strings substituted for missing payload fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub untitled: String,
    pub unknown_actor: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            untitled: "Untitled".to_string(),
            unknown_actor: "Someone".to_string(),
        }
    }
}

/// Builds a notification from a server record.
///
/// Accepts the record itself or a `{"notification": {...}}` wrapper.
/// `fallback_id` is only called when the record carries no ID.
pub fn parse_server_notification(
    record: &JsonValue,
    placeholders: &Placeholders,
    fallback_id: impl FnOnce(Timestamp) -> NotificationId,
) -> Notification {
    let record = record.get("notification").unwrap_or(record);
    let reader = PayloadReader::new(record);

    let created_at = reader
        .timestamp(&["createdAt", "created_at", "timestamp"])
        .unwrap_or_else(Timestamp::now);
    let id = reader
        .id(&["_id", "id"])
        .map(NotificationId::new)
        .unwrap_or_else(|| fallback_id(created_at));
    let title = reader
        .text(&["title"])
        .unwrap_or_else(|| placeholders.untitled.clone());
    let message = reader
        .text(&["message", "body", "content"])
        .unwrap_or_default();

    let mut notification = Notification::new(id, title, message)
        .with_created_at(created_at)
        .with_kind(
            reader
                .text(&["type"])
                .map(|t| NotificationType::parse_lenient(&t))
                .unwrap_or_default(),
        )
        .with_category(
            reader
                .text(&["category"])
                .map(|c| NotificationCategory::parse_lenient(&c))
                .unwrap_or_default(),
        )
        .with_priority(
            reader
                .text(&["priority"])
                .map(|p| NotificationPriority::parse_lenient(&p))
                .unwrap_or_default(),
        )
        .read(reader.boolean(&["isRead", "is_read", "read"]).unwrap_or(false));

    if let Some(url) = reader.text(&["actionUrl", "action_url", "link"]) {
        notification = notification.with_action_url(url);
    }

    notification
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn never(_: Timestamp) -> NotificationId {
        panic!("fallback id should not be needed")
    }

    #[test]
    fn maps_complete_record() {
        let record = json!({
            "_id": "65f",
            "title": "Helmet expiring",
            "message": "Your helmet expires in 3 days",
            "type": "warning",
            "category": "ppe",
            "priority": "high",
            "createdAt": "2024-06-01T09:00:00Z",
            "actionUrl": "/ppe/p1",
            "isRead": true
        });

        let n = parse_server_notification(&record, &Placeholders::default(), never);

        assert_eq!(n.id.as_str(), "65f");
        assert_eq!(n.kind, NotificationType::Warning);
        assert_eq!(n.category, NotificationCategory::Ppe);
        assert_eq!(n.priority, NotificationPriority::High);
        assert_eq!(n.action_url.as_deref(), Some("/ppe/p1"));
        assert!(n.is_read);
        assert_eq!(n.created_at, Timestamp::parse("2024-06-01T09:00:00Z").unwrap());
    }

    #[test]
    fn unwraps_notification_envelope() {
        let record = json!({"notification": {"id": 7, "title": "Hi"}});
        let n = parse_server_notification(&record, &Placeholders::default(), never);
        assert_eq!(n.id.as_str(), "7");
        assert_eq!(n.title, "Hi");
    }

    #[test]
    fn substitutes_defaults_for_missing_fields() {
        let record = json!({});
        let n = parse_server_notification(&record, &Placeholders::default(), |_| {
            NotificationId::new("synth")
        });

        assert_eq!(n.id.as_str(), "synth");
        assert_eq!(n.title, "Untitled");
        assert_eq!(n.message, "");
        assert_eq!(n.kind, NotificationType::Info);
        assert_eq!(n.category, NotificationCategory::General);
        assert!(!n.is_read);
    }
}
