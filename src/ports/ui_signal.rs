//! UiSignalSink port - side effects that bypass the notification store.
//!
//! Domain adapters use this for reactions that are not notifications:
//! asking the data layer to refetch a list, showing a typing indicator,
//! prompting for re-login.

use serde::Serialize;

use crate::domain::connection::ConnectionStatus;

/// Server-side collections a realtime event can invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Incidents,
    PpeAssignments,
    PpeInventory,
    TrainingSessions,
    TrainingEnrollments,
    Projects,
    Notifications,
}

/// A side effect requested by a domain adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiSignal {
    /// Cached data for `resource` is stale.
    Refetch {
        resource: ResourceKind,
        entity_id: Option<String>,
    },

    /// Someone is typing in a shared context (e.g. an incident thread).
    Typing {
        user: String,
        context: Option<String>,
        is_typing: bool,
    },

    /// The push channel changed state.
    ConnectionChanged { status: ConnectionStatus },

    /// A connection attempt or live session failed. With `will_retry`
    /// false the manager has given up until the user reconnects.
    ConnectionFailed {
        error: String,
        attempt: u32,
        will_retry: bool,
    },

    /// The token was rejected; the user must sign in again.
    ReauthRequired { reason: String },
}

pub trait UiSignalSink: Send + Sync {
    fn signal(&self, signal: UiSignal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn UiSignalSink) {}

    #[test]
    fn refetch_serializes_with_kind_tag() {
        let json = serde_json::to_value(UiSignal::Refetch {
            resource: ResourceKind::PpeInventory,
            entity_id: Some("p1".into()),
        })
        .unwrap();
        assert_eq!(json["kind"], "refetch");
        assert_eq!(json["resource"], "ppe_inventory");
    }

    #[test]
    fn connection_failed_serializes_retry_flag() {
        let json = serde_json::to_value(UiSignal::ConnectionFailed {
            error: "refused".into(),
            attempt: 5,
            will_retry: false,
        })
        .unwrap();
        assert_eq!(json["kind"], "connection_failed");
        assert_eq!(json["will_retry"], false);
    }
}
