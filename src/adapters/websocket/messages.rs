//! WebSocket wire protocol for the push channel.
//!
//! - Server → Client: named events, either `{"event": "...", "data": ...}`
//!   or the positional form `["event", data]`
//! - Client → Server: heartbeats

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::domain::foundation::{RealtimeEvent, Timestamp};

// ============================================
// Server → Client Messages
// ============================================

/// Reasons a text frame could not be turned into an event.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("frame has no event name")]
    MissingEventName,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireFrame {
    Named {
        event: String,
        #[serde(default)]
        data: JsonValue,
    },
    Positional(Vec<JsonValue>),
}

/// A named event received from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    pub event: String,
    pub data: JsonValue,
}

impl ServerFrame {
    /// Parses one text frame.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let (event, data) = match serde_json::from_str::<WireFrame>(text)? {
            WireFrame::Named { event, data } => (event, data),
            WireFrame::Positional(mut parts) => {
                if parts.is_empty() {
                    return Err(FrameError::MissingEventName);
                }
                let data = if parts.len() > 1 {
                    parts.swap_remove(1)
                } else {
                    JsonValue::Null
                };
                match parts.swap_remove(0) {
                    JsonValue::String(event) => (event, data),
                    _ => return Err(FrameError::MissingEventName),
                }
            }
        };

        if event.trim().is_empty() {
            return Err(FrameError::MissingEventName);
        }

        Ok(Self { event, data })
    }

    pub fn into_event(self) -> RealtimeEvent {
        RealtimeEvent::new(self.event, self.data)
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be sent from client to server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping { timestamp: String },
}

impl ClientMessage {
    pub fn ping() -> Self {
        ClientMessage::Ping {
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> String {
        // A tagged enum of strings always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"ping"}"#.to_string())
    }
}
