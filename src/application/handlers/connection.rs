//! ConnectionAdapter - relays the connection manager's lifecycle events.
//!
//! The manager only reports through the registry; this adapter turns its
//! `connection_status`, `connection_error` and `auth_error` events into UI
//! signals, and a rejected token additionally into a system notification.

use std::sync::Arc;

use crate::domain::connection::ConnectionStatus;
use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::{
    NotificationCategory, NotificationPriority, NotificationType,
};
use crate::ports::{EventHandler, UiSignal, UiSignalSink};

use super::context::AdapterContext;

/// Handles the connection lifecycle events.
pub struct ConnectionAdapter {
    ctx: AdapterContext,
    signals: Arc<dyn UiSignalSink>,
}

impl ConnectionAdapter {
    pub const EVENTS: &'static [&'static str] = names::CONNECTION_EVENTS;

    pub fn new(ctx: AdapterContext, signals: Arc<dyn UiSignalSink>) -> Self {
        Self { ctx, signals }
    }

    fn status_changed(&self, reader: &PayloadReader<'_>) -> Result<(), DomainError> {
        let status = reader
            .text(&["status"])
            .and_then(|s| ConnectionStatus::parse(&s))
            .or_else(|| {
                reader.boolean(&["isConnected"]).map(|connected| {
                    if connected {
                        ConnectionStatus::Connected
                    } else {
                        ConnectionStatus::Disconnected
                    }
                })
            })
            .ok_or_else(|| {
                DomainError::malformed(names::CONNECTION_STATUS, "no recognizable status")
            })?;

        self.signals.signal(UiSignal::ConnectionChanged { status });
        Ok(())
    }

    fn connection_failed(&self, reader: &PayloadReader<'_>) {
        let error = reader
            .text(&["message", "error"])
            .unwrap_or_else(|| "Connection failed".to_string());
        let attempt = reader
            .number(&["attempt"])
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(0);
        // Without the flag, assume the worst so the UI offers a reconnect
        let will_retry = reader.boolean(&["willRetry"]).unwrap_or(false);

        self.signals.signal(UiSignal::ConnectionFailed {
            error,
            attempt,
            will_retry,
        });
    }

    fn auth_failed(&self, event: &RealtimeEvent, reader: &PayloadReader<'_>) {
        let reason = reader
            .text(&["message", "error", "reason"])
            .unwrap_or_else(|| "Authentication failed".to_string());

        self.signals.signal(UiSignal::ReauthRequired {
            reason: reason.clone(),
        });

        let notification = self
            .ctx
            .draft(
                event,
                Some("session"),
                "Session expired".to_string(),
                format!("Please sign in again to keep receiving updates ({})", reason),
            )
            .with_kind(NotificationType::Error)
            .with_category(NotificationCategory::System)
            .with_priority(NotificationPriority::Urgent);
        self.ctx.publish(notification);
    }
}

impl EventHandler for ConnectionAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        let reader = PayloadReader::new(&event.payload);
        match event.name.as_str() {
            names::CONNECTION_STATUS => self.status_changed(&reader),
            names::CONNECTION_ERROR => {
                self.connection_failed(&reader);
                Ok(())
            }
            names::AUTH_ERROR => {
                self.auth_failed(event, &reader);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "ConnectionAdapter"
    }
}
