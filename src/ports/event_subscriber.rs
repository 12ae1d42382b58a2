//! EventSubscriber port - Interface for registering realtime event handlers.
//!
//! Handlers register interest in named events without knowing about the
//! transport that produces them.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ListenerId, RealtimeEvent};

/// Handler for processing realtime events.
///
/// Invoked synchronously, in registration order, on the task that received
/// the event. Implementations should be:
/// - **Quick** - long work belongs on a spawned task
/// - **Lenient** - substitute defaults for missing payload fields
/// - **Isolated** - an error or panic only loses this handler's work
///
/// # Example
///
/// ```ignore
/// struct BadgeCounter { /* ... */ }
///
/// impl EventHandler for BadgeCounter {
///     fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError> {
///         // ...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "BadgeCounter"
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Process an event.
    fn handle(&self, event: &RealtimeEvent) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to realtime events.
///
/// Every registration is retained, including repeated registrations of the
/// same handler for the same event; each one fires.
pub trait EventSubscriber: Send + Sync {
    /// Register `handler` for `event`. The returned handle removes exactly
    /// this registration.
    fn on(&self, event: &str, handler: Arc<dyn EventHandler>) -> ListenerId;

    /// Remove one registration. Returns false if it was not present.
    fn off(&self, event: &str, listener: ListenerId) -> bool;

    /// Remove every registration for `event`. Returns how many were removed.
    fn remove_all_listeners(&self, event: &str) -> usize;

    /// Number of registrations for `event`.
    fn listener_count(&self, event: &str) -> usize;

    /// Register the same handler for several events.
    fn on_all(&self, events: &[&str], handler: Arc<dyn EventHandler>) -> Vec<(String, ListenerId)> {
        events
            .iter()
            .map(|event| (event.to_string(), self.on(event, Arc::clone(&handler))))
            .collect()
    }
}

/// Combined trait for registry implementations.
///
/// A registry provides both emitting and subscribing capabilities.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
