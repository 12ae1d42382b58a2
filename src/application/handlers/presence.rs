//! PresenceAdapter - typing indicators.

use std::sync::Arc;

use crate::domain::foundation::{names, DomainError, PayloadReader, RealtimeEvent};
use crate::domain::notification::Placeholders;
use crate::ports::{EventHandler, UiSignal, UiSignalSink};

/// Handles `user_typing`.
pub struct PresenceAdapter {
    signals: Arc<dyn UiSignalSink>,
    placeholders: Placeholders,
}

impl PresenceAdapter {
    pub const EVENTS: &'static [&'static str] = &[names::USER_TYPING];

    pub fn new(signals: Arc<dyn UiSignalSink>, placeholders: Placeholders) -> Self {
        Self {
            signals,
            placeholders,
        }
    }
}

impl EventHandler for PresenceAdapter {
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
        let reader = PayloadReader::new(&event.payload);

        let user = reader
            .text(&["user.name", "userName", "name", "user"])
            .unwrap_or_else(|| self.placeholders.unknown_actor.clone());
        let context = reader.id(&["incidentId", "projectId", "context", "room", "conversationId"]);
        let is_typing = reader.boolean(&["isTyping", "typing"]).unwrap_or(true);

        self.signals.signal(UiSignal::Typing {
            user,
            context,
            is_typing,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PresenceAdapter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::signals::BroadcastSignalSink;
    use serde_json::json;

    #[tokio::test]
    async fn typing_event_becomes_signal() {
        let sink = Arc::new(BroadcastSignalSink::new(4));
        let mut rx = sink.subscribe();
        let adapter = PresenceAdapter::new(sink, Placeholders::default());

        adapter
            .handle(&RealtimeEvent::new(
                names::USER_TYPING,
                json!({"user": {"name": "Eve"}, "incidentId": "i9", "isTyping": false}),
            ))
            .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            UiSignal::Typing {
                user: "Eve".into(),
                context: Some("i9".into()),
                is_typing: false,
            }
        );
    }

    #[tokio::test]
    async fn missing_fields_default_to_someone_typing() {
        let sink = Arc::new(BroadcastSignalSink::new(4));
        let mut rx = sink.subscribe();
        let adapter = PresenceAdapter::new(sink, Placeholders::default());

        adapter
            .handle(&RealtimeEvent::new(names::USER_TYPING, json!("?")))
            .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            UiSignal::Typing {
                user: "Someone".into(),
                context: None,
                is_typing: true,
            }
        );
    }
}
