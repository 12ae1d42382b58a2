//! ProjectAdapter - turns project events into notifications.

use tracing::debug;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationType,
};
use crate::ports::EventHandler;

use super::context::{percent, AdapterContext};

const PROJECT_ID: &[&str] = &["project._id", "project.id", "projectId", "_id"];
const PROJECT_NAME: &[&str] = &["project.name", "project.title", "name", "title"];
const ACTOR: &[&str] = &[
    "createdBy.name",
    "updatedBy.name",
    "assignedBy.name",
    "project.manager.name",
    "user.name",
];

/// Handles `project_*` events.
pub struct ProjectAdapter {
    ctx: AdapterContext,
}

impl ProjectAdapter {
    pub const EVENTS: &'static [&'static str] = names::PROJECT_EVENTS;

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn describe(&self, event: &RealtimeEvent) -> Option<Notification> {
        let reader = PayloadReader::new(&event.payload);
        let entity = reader.id(PROJECT_ID);
        let name = self.ctx.title(&reader, PROJECT_NAME);

        let (title, message, kind, priority) = match event.name.as_str() {
            names::PROJECT_CREATED => (
                format!("New project: {}", name),
                format!("{} created project \"{}\"", self.ctx.actor(&reader, ACTOR), name),
                NotificationType::Info,
                NotificationPriority::Low,
            ),
            names::PROJECT_UPDATED => (
                format!("Project updated: {}", name),
                format!("\"{}\" was updated", name),
                NotificationType::Info,
                NotificationPriority::Low,
            ),
            names::PROJECT_PROGRESS_UPDATED => {
                match reader.number(&["progress", "project.progress", "percentage"]) {
                    Some(progress) if progress >= 100.0 => (
                        format!("Project completed: {}", name),
                        format!("\"{}\" is complete", name),
                        NotificationType::Success,
                        NotificationPriority::Medium,
                    ),
                    Some(progress) => (
                        format!("Project progress: {}", name),
                        format!("\"{}\" is {} complete", name, percent(progress)),
                        NotificationType::Info,
                        NotificationPriority::Low,
                    ),
                    None => (
                        format!("Project progress: {}", name),
                        format!("Progress on \"{}\" was updated", name),
                        NotificationType::Info,
                        NotificationPriority::Low,
                    ),
                }
            }
            names::PROJECT_ASSIGNED => (
                format!("Assigned to project: {}", name),
                format!(
                    "{} assigned you to \"{}\"",
                    self.ctx.actor(&reader, ACTOR),
                    name
                ),
                NotificationType::Info,
                NotificationPriority::Medium,
            ),
            _ => return None,
        };

        let mut notification = self
            .ctx
            .draft(event, entity.as_deref(), title, message)
            .with_kind(kind)
            .with_category(NotificationCategory::Project)
            .with_priority(priority);
        if let Some(id) = entity {
            notification = notification.with_action_url(format!("/projects/{}", id));
        }
        Some(notification)
    }
}

impl EventHandler for ProjectAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        match self.describe(event) {
            Some(notification) => {
                self.ctx.publish(notification);
            }
            None => debug!(event = %event.name, "ProjectAdapter ignoring event"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ProjectAdapter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::context::test_support;
    use serde_json::json;

    fn handle(event: &str, payload: serde_json::Value) -> Notification {
        let adapter = ProjectAdapter::new(test_support::context());
        adapter.handle(&RealtimeEvent::new(event, payload)).unwrap();
        adapter.ctx.store().snapshot().notifications[0].clone()
    }

    #[test]
    fn progress_reports_percentage() {
        let n = handle(
            names::PROJECT_PROGRESS_UPDATED,
            json!({"project": {"_id": "pr1", "name": "Scaffold audit"}, "progress": 60}),
        );
        assert_eq!(n.message, "\"Scaffold audit\" is 60% complete");
        assert_eq!(n.action_url.as_deref(), Some("/projects/pr1"));
    }

    #[test]
    fn full_progress_is_completion() {
        let n = handle(
            names::PROJECT_PROGRESS_UPDATED,
            json!({"project": {"name": "Scaffold audit"}, "progress": 100}),
        );
        assert_eq!(n.title, "Project completed: Scaffold audit");
        assert_eq!(n.kind, NotificationType::Success);
    }

    #[test]
    fn assignment_names_assigner() {
        let n = handle(
            names::PROJECT_ASSIGNED,
            json!({"project": {"title": "Roof repair"}, "assignedBy": {"name": "Dee"}}),
        );
        assert_eq!(n.message, "Dee assigned you to \"Roof repair\"");
        assert_eq!(n.category, NotificationCategory::Project);
    }
}
