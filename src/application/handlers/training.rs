//! TrainingAdapter - turns training session and enrollment events into notifications.

use tracing::debug;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationType,
};
use crate::ports::EventHandler;

use super::context::{percent, AdapterContext};

const ENTITY_ID: &[&str] = &[
    "enrollment._id",
    "enrollmentId",
    "session._id",
    "training._id",
    "sessionId",
    "trainingId",
    "_id",
];
const TRAINING_TITLE: &[&str] = &[
    "session.title",
    "training.title",
    "trainingSession.title",
    "enrollment.session.title",
    "title",
];
const TRAINEE: &[&str] = &["user.name", "trainee.name", "employee.name", "enrollment.user.name"];

/// Handles `training_*` events.
pub struct TrainingAdapter {
    ctx: AdapterContext,
}

impl TrainingAdapter {
    pub const EVENTS: &'static [&'static str] = names::TRAINING_EVENTS;

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn describe(&self, event: &RealtimeEvent) -> Option<Notification> {
        let reader = PayloadReader::new(&event.payload);
        let entity = reader.id(ENTITY_ID);
        let title = self.ctx.title(&reader, TRAINING_TITLE);

        let (heading, message, kind, priority) = match event.name.as_str() {
            names::TRAINING_SESSION_CREATED => {
                let when = reader
                    .timestamp(&["session.scheduledDate", "scheduledDate", "session.startDate", "startDate"])
                    .map(|at| format!(" for {}", at.as_datetime().format("%b %-d, %Y")))
                    .unwrap_or_default();
                (
                    format!("New training session: {}", title),
                    format!("\"{}\" has been scheduled{}", title, when),
                    NotificationType::Info,
                    NotificationPriority::Medium,
                )
            }
            names::TRAINING_ENROLLED => (
                format!("Enrolled in training: {}", title),
                format!("{} enrolled in \"{}\"", self.ctx.actor(&reader, TRAINEE), title),
                NotificationType::Success,
                NotificationPriority::Medium,
            ),
            names::TRAINING_STARTED => (
                format!("Training started: {}", title),
                format!("\"{}\" has started", title),
                NotificationType::Info,
                NotificationPriority::Medium,
            ),
            names::TRAINING_SUBMITTED => (
                format!("Training submitted: {}", title),
                format!(
                    "{} submitted \"{}\" for grading",
                    self.ctx.actor(&reader, TRAINEE),
                    title
                ),
                NotificationType::Info,
                NotificationPriority::Low,
            ),
            names::TRAINING_COMPLETED => (
                format!("Training completed: {}", title),
                format!("{} completed \"{}\"", self.ctx.actor(&reader, TRAINEE), title),
                NotificationType::Success,
                NotificationPriority::Low,
            ),
            names::TRAINING_GRADED => {
                let passed = reader.boolean(&["passed", "result.passed", "enrollment.passed"]);
                let score = reader.number(&["score", "grade", "result.score", "enrollment.score"]);
                let message = match score {
                    Some(score) => format!("You scored {} on \"{}\"", percent(score), title),
                    None => format!("\"{}\" has been graded", title),
                };
                let (kind, priority) = match passed {
                    Some(false) => (NotificationType::Warning, NotificationPriority::High),
                    Some(true) => (NotificationType::Success, NotificationPriority::Medium),
                    None => (NotificationType::Info, NotificationPriority::Medium),
                };
                (format!("Training graded: {}", title), message, kind, priority)
            }
            _ => return None,
        };

        Some(
            self.ctx
                .draft(event, entity.as_deref(), heading, message)
                .with_kind(kind)
                .with_category(NotificationCategory::Training)
                .with_priority(priority)
                .with_action_url("/training"),
        )
    }
}

impl EventHandler for TrainingAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        match self.describe(event) {
            Some(notification) => {
                self.ctx.publish(notification);
            }
            None => debug!(event = %event.name, "TrainingAdapter ignoring event"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TrainingAdapter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::context::test_support;
    use serde_json::json;

    fn handle(event: &str, payload: serde_json::Value) -> Notification {
        let adapter = TrainingAdapter::new(test_support::context());
        adapter.handle(&RealtimeEvent::new(event, payload)).unwrap();
        adapter.ctx.store().snapshot().notifications[0].clone()
    }

    #[test]
    fn session_created_mentions_schedule() {
        let n = handle(
            names::TRAINING_SESSION_CREATED,
            json!({"session": {"_id": "s1", "title": "Fire safety", "scheduledDate": "2024-05-03T09:00:00Z"}}),
        );
        assert_eq!(n.title, "New training session: Fire safety");
        assert_eq!(n.message, "\"Fire safety\" has been scheduled for May 3, 2024");
        assert_eq!(n.category, NotificationCategory::Training);
    }

    #[test]
    fn failed_grade_is_a_warning() {
        let n = handle(
            names::TRAINING_GRADED,
            json!({"training": {"title": "Ladders"}, "score": 42, "passed": false}),
        );
        assert_eq!(n.message, "You scored 42% on \"Ladders\"");
        assert_eq!(n.kind, NotificationType::Warning);
    }

    #[test]
    fn enrollment_without_names_uses_placeholders() {
        let n = handle(names::TRAINING_ENROLLED, json!({}));
        assert_eq!(n.message, "Someone enrolled in \"Untitled\"");
    }
}
