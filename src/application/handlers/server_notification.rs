//! ServerNotificationAdapter - notifications authored by the server itself.
//!
//! `notification_created` carries a complete server record and is added as
//! is; `notification_read` mirrors a read made in another session.

use tracing::debug;

use crate::domain::foundation::{
    names, DomainError, NotificationId, PayloadReader, RealtimeEvent,
};
use crate::domain::notification::parse_server_notification;
use crate::ports::EventHandler;

use super::context::AdapterContext;

const READ_ID: &[&str] = &[
    "notificationId",
    "notification_id",
    "notification._id",
    "notification.id",
    "_id",
    "id",
];

/// Handles `notification_created` and `notification_read`.
pub struct ServerNotificationAdapter {
    ctx: AdapterContext,
}

impl ServerNotificationAdapter {
    pub const EVENTS: &'static [&'static str] =
        &[names::NOTIFICATION_CREATED, names::NOTIFICATION_READ];

    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn created(&self, event: &RealtimeEvent) {
        let notification =
            parse_server_notification(&event.payload, self.ctx.placeholders(), |at| {
                self.ctx.ids().synthesize(&event.name, None, at)
            });
        self.ctx.publish(notification);
    }

    fn read(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        let reader = PayloadReader::new(&event.payload);

        if reader.boolean(&["all", "allRead"]).unwrap_or(false) {
            let marked = self.ctx.store().mark_all_as_read();
            debug!(marked, "Server marked all notifications read");
            return Ok(());
        }

        let id = reader.id(READ_ID).ok_or_else(|| {
            DomainError::malformed(&event.name, "notification_read without an ID")
        })?;
        let id = NotificationId::new(id);

        // Already evicted or read is fine
        if !self.ctx.store().mark_as_read(&id) {
            debug!(id = %id, "notification_read for unknown or read entry");
        }
        Ok(())
    }
}

impl EventHandler for ServerNotificationAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        match event.name.as_str() {
            names::NOTIFICATION_CREATED => {
                self.created(event);
                Ok(())
            }
            names::NOTIFICATION_READ => self.read(event),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "ServerNotificationAdapter"
    }
}
