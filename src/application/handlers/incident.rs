//! IncidentAdapter - turns incident lifecycle events into notifications.

use tracing::debug;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationType,
};
use crate::ports::EventHandler;

use super::context::{percent, AdapterContext};

const INCIDENT_ID: &[&str] = &["incident._id", "incident.id", "incidentId", "_id"];
const INCIDENT_TITLE: &[&str] = &["incident.title", "title", "incident.type"];
const REPORTER: &[&str] = &[
    "reporter.name",
    "reportedBy.name",
    "incident.reportedBy.name",
    "user.name",
];
const ASSIGNEE: &[&str] = &[
    "assignee.name",
    "assignedTo.name",
    "incident.assignedTo.name",
];
const ACTOR: &[&str] = &["updatedBy.name", "closedBy.name", "user.name"];
const SEVERITY: &[&str] = &["incident.severity", "severity", "priority"];

/// Handles `incident_*` events.
pub struct IncidentAdapter {
    ctx: AdapterContext,
}

impl IncidentAdapter {
    pub const EVENTS: &'static [&'static str] = names::INCIDENT_EVENTS;

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn describe(&self, event: &RealtimeEvent) -> Option<Notification> {
        let reader = PayloadReader::new(&event.payload);
        let entity = reader.id(INCIDENT_ID);
        let title = self.ctx.title(&reader, INCIDENT_TITLE);
        let severity = reader
            .text(SEVERITY)
            .map(|s| NotificationPriority::parse_lenient(&s));

        let (heading, message, kind, priority) = match event.name.as_str() {
            names::INCIDENT_REPORTED => (
                format!("Incident reported: {}", title),
                format!("{} reported \"{}\"", self.ctx.actor(&reader, REPORTER), title),
                NotificationType::Warning,
                severity.unwrap_or(NotificationPriority::High),
            ),
            names::INCIDENT_CLASSIFIED => {
                let classification = reader
                    .text(&["classification", "incident.classification", "incident.severity"])
                    .unwrap_or_else(|| "reviewed".to_string());
                (
                    format!("Incident classified: {}", title),
                    format!("\"{}\" was classified as {}", title, classification),
                    NotificationType::Info,
                    severity.unwrap_or_default(),
                )
            }
            names::INCIDENT_ASSIGNED => (
                format!("Incident assigned: {}", title),
                format!(
                    "{} was assigned to \"{}\"",
                    self.ctx.actor(&reader, ASSIGNEE),
                    title
                ),
                NotificationType::Info,
                severity.unwrap_or(NotificationPriority::High),
            ),
            names::INCIDENT_PROGRESS_UPDATED => {
                let detail = reader
                    .number(&["progress", "incident.progress"])
                    .map(|p| format!("is {} resolved", percent(p)))
                    .or_else(|| {
                        reader
                            .text(&["status", "incident.status"])
                            .map(|s| format!("is now {}", s))
                    })
                    .unwrap_or_else(|| "was updated".to_string());
                (
                    format!("Incident updated: {}", title),
                    format!("\"{}\" {}", title, detail),
                    NotificationType::Info,
                    severity.unwrap_or_default(),
                )
            }
            names::INCIDENT_CLOSED => (
                format!("Incident closed: {}", title),
                format!("{} closed \"{}\"", self.ctx.actor(&reader, ACTOR), title),
                NotificationType::Success,
                NotificationPriority::Low,
            ),
            names::INCIDENT_REPORTED_CONFIRMATION => (
                "Incident report submitted".to_string(),
                format!("Your report \"{}\" was received", title),
                NotificationType::Success,
                NotificationPriority::Low,
            ),
            _ => return None,
        };

        let mut notification = self
            .ctx
            .draft(event, entity.as_deref(), heading, message)
            .with_kind(kind)
            .with_category(NotificationCategory::Safety)
            .with_priority(priority);
        if let Some(id) = entity {
            notification = notification.with_action_url(format!("/incidents/{}", id));
        }
        Some(notification)
    }
}

impl EventHandler for IncidentAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        match self.describe(event) {
            Some(notification) => {
                self.ctx.publish(notification);
            }
            None => debug!(event = %event.name, "IncidentAdapter ignoring event"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "IncidentAdapter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::context::test_support;
    use serde_json::json;

    fn adapter() -> IncidentAdapter {
        IncidentAdapter::new(test_support::context())
    }

    #[test]
    fn reported_incident_names_title_and_reporter() {
        let adapter = adapter();
        let event = RealtimeEvent::new(
            names::INCIDENT_REPORTED,
            json!({"incident": {"_id": "i1", "title": "Fire", "severity": "critical"}, "reporter": {"name": "An"}}),
        );

        adapter.handle(&event).unwrap();

        let snapshot = adapter.ctx.store().snapshot();
        let n = &snapshot.notifications[0];
        assert!(n.title.contains("Fire"));
        assert!(n.message.contains("An"));
        assert_eq!(n.category, NotificationCategory::Safety);
        assert_eq!(n.priority, NotificationPriority::Urgent);
        assert_eq!(n.action_url.as_deref(), Some("/incidents/i1"));
    }

    #[test]
    fn repeated_report_within_window_is_one_notification() {
        let adapter = adapter();
        let payload = json!({"incident": {"_id": "i1", "title": "Fire"}, "reporter": {"name": "An"}});

        adapter
            .handle(&RealtimeEvent::new(names::INCIDENT_REPORTED, payload.clone()))
            .unwrap();
        adapter
            .handle(&RealtimeEvent::new(names::INCIDENT_REPORTED, payload))
            .unwrap();

        assert_eq!(adapter.ctx.store().len(), 1);
        assert_eq!(adapter.ctx.store().unread_count(), 1);
    }

    #[test]
    fn empty_payload_uses_placeholders() {
        let adapter = adapter();

        adapter
            .handle(&RealtimeEvent::new(names::INCIDENT_CLOSED, json!(null)))
            .unwrap();

        let n = &adapter.ctx.store().snapshot().notifications[0];
        assert_eq!(n.title, "Incident closed: Untitled");
        assert_eq!(n.message, "Someone closed \"Untitled\"");
        assert!(n.action_url.is_none());
    }

    #[test]
    fn progress_prefers_percentage_over_status() {
        let adapter = adapter();
        let event = RealtimeEvent::new(
            names::INCIDENT_PROGRESS_UPDATED,
            json!({"incidentId": "i2", "title": "Spill", "progress": "40", "status": "investigating"}),
        );

        adapter.handle(&event).unwrap();

        let n = &adapter.ctx.store().snapshot().notifications[0];
        assert_eq!(n.message, "\"Spill\" is 40% resolved");
    }

    #[test]
    fn unrelated_event_is_ignored() {
        let adapter = adapter();
        adapter
            .handle(&RealtimeEvent::new(names::PPE_ISSUED, json!({})))
            .unwrap();
        assert!(adapter.ctx.store().is_empty());
    }
}
