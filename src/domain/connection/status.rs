//! Connection status state machine and the UI-facing connection state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of the single physical push connection.
///
/// ```text
/// Disconnected ──► Connecting ──► Connected
///      ▲               │              │
///      └───────────────┴──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
        }
    }

    /// Parses the wire name used in `connection_status` payloads.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disconnected" => Some(ConnectionStatus::Disconnected),
            "connecting" | "reconnecting" => Some(ConnectionStatus::Connecting),
            "connected" => Some(ConnectionStatus::Connected),
            _ => None,
        }
    }
}

impl StateMachine for ConnectionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionStatus::*;
        match self {
            Disconnected => vec![Connecting],
            Connecting => vec![Connected, Disconnected],
            Connected => vec![Disconnected],
        }
    }
}

/// Connection state as seen by the UI.
///
/// Written only by the connection manager; everyone else reads snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub is_connected: bool,
    pub last_error: Option<String>,
    pub status: ConnectionStatus,
    /// Consecutive failed attempts since the last successful connection.
    pub attempt: u32,
    /// Set once automatic reconnection has given up.
    pub retries_exhausted: bool,
}

impl ConnectionState {
    pub(crate) fn with_status(&self, status: ConnectionStatus) -> Self {
        Self {
            is_connected: status.is_connected(),
            status,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_valid() {
        let s = ConnectionStatus::Disconnected
            .transition_to(ConnectionStatus::Connecting)
            .and_then(|s| s.transition_to(ConnectionStatus::Connected))
            .and_then(|s| s.transition_to(ConnectionStatus::Disconnected));
        assert_eq!(s, Ok(ConnectionStatus::Disconnected));
    }

    #[test]
    fn parse_accepts_wire_names() {
        assert_eq!(ConnectionStatus::parse("Connected"), Some(ConnectionStatus::Connected));
        assert_eq!(ConnectionStatus::parse("reconnecting"), Some(ConnectionStatus::Connecting));
        assert_eq!(ConnectionStatus::parse("offline"), None);
    }

    #[test]
    fn cannot_skip_connecting() {
        assert!(ConnectionStatus::Disconnected
            .transition_to(ConnectionStatus::Connected)
            .is_err());
    }

    #[test]
    fn no_status_is_terminal() {
        for s in [
            ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
        ] {
            assert!(!s.is_terminal());
        }
    }

    #[test]
    fn can_transition_to_follows_transition_table() {
        use ConnectionStatus::*;
        let all = [Disconnected, Connecting, Connected];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
        assert!(Connecting.can_transition_to(&Disconnected));
        assert!(!Connected.can_transition_to(&Connecting));
    }

    #[test]
    fn with_status_keeps_is_connected_consistent() {
        let state = ConnectionState::default().with_status(ConnectionStatus::Connected);
        assert!(state.is_connected);
        let state = state.with_status(ConnectionStatus::Disconnected);
        assert!(!state.is_connected);
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_value(ConnectionState::default()).unwrap();
        assert_eq!(json["isConnected"], false);
        assert_eq!(json["status"], "disconnected");
        assert!(json["lastError"].is_null());
    }
}
