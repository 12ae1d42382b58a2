//! Realtime event envelope and the catalogue of named server events.
//!
//! - `RealtimeEvent` - what the registry fans out to handlers
//! - `names` - every event name the push channel is known to carry

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::Timestamp;

/// Event names carried over the push channel.
///
/// The three `connection_*`/`auth_error` names are emitted locally by the
/// connection manager; all others originate on the server.
pub mod names {
    pub const CONNECTION_STATUS: &str = "connection_status";
    pub const CONNECTION_ERROR: &str = "connection_error";
    pub const AUTH_ERROR: &str = "auth_error";

    pub const INCIDENT_REPORTED: &str = "incident_reported";
    pub const INCIDENT_CLASSIFIED: &str = "incident_classified";
    pub const INCIDENT_ASSIGNED: &str = "incident_assigned";
    pub const INCIDENT_PROGRESS_UPDATED: &str = "incident_progress_updated";
    pub const INCIDENT_CLOSED: &str = "incident_closed";
    pub const INCIDENT_REPORTED_CONFIRMATION: &str = "incident_reported_confirmation";

    pub const PPE_ISSUED: &str = "ppe_issued";
    pub const PPE_RETURNED: &str = "ppe_returned";
    pub const PPE_REPORTED: &str = "ppe_reported";
    pub const PPE_REPORTED_CONFIRMATION: &str = "ppe_reported_confirmation";
    pub const PPE_EXPIRING: &str = "ppe_expiring";
    pub const PPE_EXPIRING_BULK: &str = "ppe_expiring_bulk";
    pub const PPE_LOW_STOCK: &str = "ppe_low_stock";
    pub const PPE_ITEM_CREATED: &str = "ppe_item_created";
    pub const PPE_ITEM_UPDATED: &str = "ppe_item_updated";

    pub const TRAINING_SESSION_CREATED: &str = "training_session_created";
    pub const TRAINING_ENROLLED: &str = "training_enrolled";
    pub const TRAINING_STARTED: &str = "training_started";
    pub const TRAINING_SUBMITTED: &str = "training_submitted";
    pub const TRAINING_COMPLETED: &str = "training_completed";
    pub const TRAINING_GRADED: &str = "training_graded";

    pub const PROJECT_CREATED: &str = "project_created";
    pub const PROJECT_UPDATED: &str = "project_updated";
    pub const PROJECT_PROGRESS_UPDATED: &str = "project_progress_updated";
    pub const PROJECT_ASSIGNED: &str = "project_assigned";

    pub const NOTIFICATION_CREATED: &str = "notification_created";
    pub const NOTIFICATION_READ: &str = "notification_read";
    pub const USER_TYPING: &str = "user_typing";

    pub const INCIDENT_EVENTS: &[&str] = &[
        INCIDENT_REPORTED,
        INCIDENT_CLASSIFIED,
        INCIDENT_ASSIGNED,
        INCIDENT_PROGRESS_UPDATED,
        INCIDENT_CLOSED,
        INCIDENT_REPORTED_CONFIRMATION,
    ];

    pub const PPE_EVENTS: &[&str] = &[
        PPE_ISSUED,
        PPE_RETURNED,
        PPE_REPORTED,
        PPE_REPORTED_CONFIRMATION,
        PPE_EXPIRING,
        PPE_EXPIRING_BULK,
        PPE_LOW_STOCK,
        PPE_ITEM_CREATED,
        PPE_ITEM_UPDATED,
    ];

    pub const TRAINING_EVENTS: &[&str] = &[
        TRAINING_SESSION_CREATED,
        TRAINING_ENROLLED,
        TRAINING_STARTED,
        TRAINING_SUBMITTED,
        TRAINING_COMPLETED,
        TRAINING_GRADED,
    ];

    pub const PROJECT_EVENTS: &[&str] = &[
        PROJECT_CREATED,
        PROJECT_UPDATED,
        PROJECT_PROGRESS_UPDATED,
        PROJECT_ASSIGNED,
    ];

    pub const CONNECTION_EVENTS: &[&str] = &[CONNECTION_STATUS, CONNECTION_ERROR, AUTH_ERROR];
}

/// Every event name the core handles: the server catalogue plus the
/// `connection_*`/`auth_error` events the connection manager emits locally.
pub static ALL_EVENTS: once_cell::sync::Lazy<Vec<&'static str>> =
    once_cell::sync::Lazy::new(|| {
        let mut all = Vec::new();
        all.extend_from_slice(names::CONNECTION_EVENTS);
        all.extend_from_slice(names::INCIDENT_EVENTS);
        all.extend_from_slice(names::PPE_EVENTS);
        all.extend_from_slice(names::TRAINING_EVENTS);
        all.extend_from_slice(names::PROJECT_EVENTS);
        all.extend_from_slice(&[
            names::NOTIFICATION_CREATED,
            names::NOTIFICATION_READ,
            names::USER_TYPING,
        ]);
        all
    });

/// Returns true if `name` is part of the known event catalogue.
pub fn is_known_event(name: &str) -> bool {
    ALL_EVENTS.iter().any(|known| *known == name)
}

/// A named event as delivered to registry handlers.
///
/// The payload shape varies by event; handlers read it leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeEvent {
    /// Event name used for routing (e.g. "incident_reported").
    pub name: String,

    /// Raw payload as received.
    pub payload: JsonValue,

    /// When the transport handed this event to the registry.
    pub received_at: Timestamp,
}

impl RealtimeEvent {
    /// Creates an event stamped with the current time.
    pub fn new(name: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            name: name.into(),
            payload,
            received_at: Timestamp::now(),
        }
    }

    /// Overrides the receive timestamp.
    pub fn received_at(mut self, at: Timestamp) -> Self {
        self.received_at = at;
        self
    }

    /// Deserialize payload to a specific type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
