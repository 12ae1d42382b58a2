//! PpeAdapter - turns PPE assignment and inventory events into notifications.

use tracing::debug;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationType,
};
use crate::ports::EventHandler;

use super::context::AdapterContext;

const ENTITY_ID: &[&str] = &[
    "assignment._id",
    "assignmentId",
    "ppe._id",
    "item._id",
    "ppeId",
    "itemId",
    "_id",
];
const ITEM_NAME: &[&str] = &[
    "ppe.name",
    "item.name",
    "ppeItem.name",
    "assignment.ppe.name",
    "assignment.item.name",
    "name",
];
const RECIPIENT: &[&str] = &[
    "user.name",
    "assignedTo.name",
    "employee.name",
    "assignment.user.name",
];
const REPORTER: &[&str] = &["reportedBy.name", "reporter.name", "user.name"];

/// Handles `ppe_*` events.
pub struct PpeAdapter {
    ctx: AdapterContext,
}

impl PpeAdapter {
    pub const EVENTS: &'static [&'static str] = names::PPE_EVENTS;

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn describe(&self, event: &RealtimeEvent) -> Option<Notification> {
        let reader = PayloadReader::new(&event.payload);
        let entity = reader.id(ENTITY_ID);
        let item = self.ctx.title(&reader, ITEM_NAME);

        let (title, message, kind, priority) = match event.name.as_str() {
            names::PPE_ISSUED => (
                format!("PPE issued: {}", item),
                format!("{} was issued to {}", item, self.ctx.actor(&reader, RECIPIENT)),
                NotificationType::Info,
                NotificationPriority::Medium,
            ),
            names::PPE_RETURNED => (
                format!("PPE returned: {}", item),
                format!("{} returned {}", self.ctx.actor(&reader, RECIPIENT), item),
                NotificationType::Success,
                NotificationPriority::Low,
            ),
            names::PPE_REPORTED => {
                let mut message =
                    format!("{} reported a problem with {}", self.ctx.actor(&reader, REPORTER), item);
                if let Some(reason) = reader.text(&["issue", "reason", "description"]) {
                    message.push_str(": ");
                    message.push_str(&reason);
                }
                (
                    format!("PPE issue reported: {}", item),
                    message,
                    NotificationType::Warning,
                    NotificationPriority::High,
                )
            }
            names::PPE_REPORTED_CONFIRMATION => (
                "PPE report submitted".to_string(),
                format!("Your report about {} was received", item),
                NotificationType::Success,
                NotificationPriority::Low,
            ),
            names::PPE_EXPIRING => {
                let message = match reader.number(&["daysUntilExpiry", "daysRemaining", "days"]) {
                    Some(days) if days <= 0.0 => format!("{} has expired", item),
                    Some(days) if days < 1.5 => format!("{} expires tomorrow", item),
                    Some(days) => format!("{} expires in {:.0} days", item, days),
                    None => format!("{} expires soon", item),
                };
                (
                    format!("PPE expiring soon: {}", item),
                    message,
                    NotificationType::Warning,
                    NotificationPriority::High,
                )
            }
            names::PPE_EXPIRING_BULK => {
                let count = reader
                    .array_len(&["items", "assignments", "ppe"])
                    .or_else(|| reader.number(&["count", "total"]).map(|n| n.max(0.0) as usize))
                    .unwrap_or(0);
                let title = match count {
                    0 => "PPE items expiring soon".to_string(),
                    1 => "1 PPE item expiring soon".to_string(),
                    n => format!("{} PPE items expiring soon", n),
                };
                (
                    title,
                    "Review upcoming PPE expirations".to_string(),
                    NotificationType::Warning,
                    NotificationPriority::High,
                )
            }
            names::PPE_LOW_STOCK => {
                let message = match reader.number(&["quantity", "currentStock", "stock", "item.quantity"]) {
                    Some(qty) => format!("Only {:.0} {} left in stock", qty.max(0.0), item),
                    None => format!("{} is running low", item),
                };
                (
                    format!("Low stock: {}", item),
                    message,
                    NotificationType::Warning,
                    NotificationPriority::High,
                )
            }
            names::PPE_ITEM_CREATED => (
                format!("New PPE item: {}", item),
                format!("{} was added to inventory", item),
                NotificationType::Info,
                NotificationPriority::Low,
            ),
            names::PPE_ITEM_UPDATED => (
                format!("PPE item updated: {}", item),
                format!("{} details were updated", item),
                NotificationType::Info,
                NotificationPriority::Low,
            ),
            _ => return None,
        };

        Some(
            self.ctx
                .draft(event, entity.as_deref(), title, message)
                .with_kind(kind)
                .with_category(NotificationCategory::Ppe)
                .with_priority(priority)
                .with_action_url("/ppe"),
        )
    }
}

impl EventHandler for PpeAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        match self.describe(event) {
            Some(notification) => {
                self.ctx.publish(notification);
            }
            None => debug!(event = %event.name, "PpeAdapter ignoring event"),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PpeAdapter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::context::test_support;
    use serde_json::json;

    fn handle(event: &str, payload: serde_json::Value) -> Notification {
        let adapter = PpeAdapter::new(test_support::context());
        adapter.handle(&RealtimeEvent::new(event, payload)).unwrap();
        adapter.ctx.store().snapshot().notifications[0].clone()
    }

    #[test]
    fn issued_names_item_and_recipient() {
        let n = handle(
            names::PPE_ISSUED,
            json!({"assignment": {"_id": "a1", "ppe": {"name": "Hard hat"}}, "user": {"name": "Bo"}}),
        );
        assert_eq!(n.title, "PPE issued: Hard hat");
        assert_eq!(n.message, "Hard hat was issued to Bo");
        assert_eq!(n.category, NotificationCategory::Ppe);
        assert!(n.id.as_str().starts_with("ppe_issued-a1-"));
    }

    #[test]
    fn expiring_describes_remaining_days() {
        let n = handle(names::PPE_EXPIRING, json!({"ppe": {"name": "Gloves"}, "daysUntilExpiry": 3}));
        assert_eq!(n.message, "Gloves expires in 3 days");
        assert_eq!(n.kind, NotificationType::Warning);

        let n = handle(names::PPE_EXPIRING, json!({"ppe": {"name": "Gloves"}, "daysUntilExpiry": 0}));
        assert_eq!(n.message, "Gloves has expired");
    }

    #[test]
    fn bulk_expiry_counts_items() {
        let n = handle(names::PPE_EXPIRING_BULK, json!({"items": [{}, {}, {}]}));
        assert_eq!(n.title, "3 PPE items expiring soon");

        let n = handle(names::PPE_EXPIRING_BULK, json!({"count": "1"}));
        assert_eq!(n.title, "1 PPE item expiring soon");
    }

    #[test]
    fn low_stock_reports_quantity() {
        let n = handle(names::PPE_LOW_STOCK, json!({"item": {"name": "Masks"}, "quantity": 4}));
        assert_eq!(n.message, "Only 4 Masks left in stock");
        assert_eq!(n.priority, NotificationPriority::High);
    }

    #[test]
    fn reported_appends_reason() {
        let n = handle(
            names::PPE_REPORTED,
            json!({"ppe": {"name": "Harness"}, "reportedBy": {"name": "Cy"}, "reason": "frayed strap"}),
        );
        assert_eq!(n.message, "Cy reported a problem with Harness: frayed strap");
    }
}
