//! Shared context handed to every notification-producing adapter.

use std::sync::Arc;

use crate::domain::foundation::{NotificationId, PayloadReader, RealtimeEvent, Timestamp};
use crate::domain::notification::{
    AddOutcome, IdSynthesizer, Notification, NotificationStore, Placeholders,
};

/// Payload fields that may carry the moment the server-side change happened.
const OCCURRED_AT_PATHS: &[&str] = &["timestamp", "createdAt", "created_at", "occurredAt"];

/// Payload fields that may carry a server-assigned notification ID.
const NOTIFICATION_ID_PATHS: &[&str] = &["notificationId", "notification_id", "notification._id"];

/// Store access plus the defaults adapters substitute for missing fields.
#[derive(Clone)]
pub struct AdapterContext {
    store: Arc<NotificationStore>,
    ids: Arc<IdSynthesizer>,
    placeholders: Placeholders,
    notifications_enabled: bool,
}

impl AdapterContext {
    pub fn new(
        store: Arc<NotificationStore>,
        ids: Arc<IdSynthesizer>,
        placeholders: Placeholders,
    ) -> Self {
        Self {
            store,
            ids,
            placeholders,
            notifications_enabled: true,
        }
    }

    /// With notifications disabled, adapters still run but never touch the store.
    pub fn with_notifications_enabled(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    pub fn store(&self) -> &Arc<NotificationStore> {
        &self.store
    }

    pub fn ids(&self) -> &IdSynthesizer {
        &self.ids
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// Display name at the first path that has one, or the unknown-actor placeholder.
    pub(crate) fn actor(&self, reader: &PayloadReader<'_>, paths: &[&str]) -> String {
        reader
            .text(paths)
            .unwrap_or_else(|| self.placeholders.unknown_actor.clone())
    }

    /// Entity title at the first path that has one, or the untitled placeholder.
    pub(crate) fn title(&self, reader: &PayloadReader<'_>, paths: &[&str]) -> String {
        reader
            .text(paths)
            .unwrap_or_else(|| self.placeholders.untitled.clone())
    }

    /// Starts a notification for `event` about `entity_id`.
    ///
    /// The ID is the server's when the payload carries one, otherwise
    /// synthesized. `created_at` is the payload's timestamp, falling back to
    /// when the event was received.
    pub(crate) fn draft(
        &self,
        event: &RealtimeEvent,
        entity_id: Option<&str>,
        title: String,
        message: String,
    ) -> Notification {
        let reader = PayloadReader::new(&event.payload);
        let created_at: Timestamp = reader
            .timestamp(OCCURRED_AT_PATHS)
            .unwrap_or(event.received_at);
        let id = reader
            .id(NOTIFICATION_ID_PATHS)
            .map(NotificationId::new)
            .unwrap_or_else(|| self.ids.synthesize(&event.name, entity_id, created_at));

        Notification::new(id, title, message).with_created_at(created_at)
    }

    /// Adds to the store unless notifications are disabled.
    pub(crate) fn publish(&self, notification: Notification) -> Option<AddOutcome> {
        if !self.notifications_enabled {
            tracing::trace!(id = %notification.id, "Notifications disabled, dropping");
            return None;
        }
        Some(self.store.add(notification))
    }
}

/// Formats a percentage-like number without trailing decimals.
pub(crate) fn percent(value: f64) -> String {
    format!("{:.0}%", value.clamp(0.0, 100.0))
}
