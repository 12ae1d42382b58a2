//! In-process event registry.
//!
//! The local pub/sub layer between the transport and the domain adapters.
//! Delivery is synchronous and in registration order; each handler runs in
//! isolation, so an error or panic in one never reaches the others or the
//! caller.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::{ListenerId, RealtimeEvent};
use crate::ports::{EmitReport, EventHandler, EventPublisher, EventSubscriber};

type Listeners = Vec<(ListenerId, Arc<dyn EventHandler>)>;

/// Process-wide event registry.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(InProcessEventRegistry::new());
///
/// let id = registry.on("incident_reported", handler);
/// registry.emit(RealtimeEvent::new("incident_reported", payload));
/// registry.off("incident_reported", id);
/// ```
pub struct InProcessEventRegistry {
    handlers: RwLock<HashMap<String, Listeners>>,
}

impl InProcessEventRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Create as an Arc (for sharing with the transport and adapters).
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Event names that currently have at least one listener.
    pub fn events(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = handlers
            .iter()
            .filter(|(_, listeners)| !listeners.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Total registrations across all events.
    pub fn total_listeners(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl Default for InProcessEventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InProcessEventRegistry {
    fn emit(&self, event: RealtimeEvent) -> EmitReport {
        // Clone handlers to release the lock before invoking them; handlers
        // may register or remove listeners while running.
        let listeners: Listeners = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers.get(&event.name).cloned().unwrap_or_default()
        };

        if listeners.is_empty() {
            tracing::trace!(event = %event.name, "No listeners for event");
            return EmitReport::default();
        }

        let mut report = EmitReport {
            invoked: listeners.len(),
            failed: Vec::new(),
        };

        for (listener, handler) in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        event = %event.name,
                        handler = handler.name(),
                        listener = %listener,
                        error = %e,
                        "Event handler failed"
                    );
                    report.failed.push(handler.name());
                }
                Err(panic) => {
                    tracing::error!(
                        event = %event.name,
                        handler = handler.name(),
                        listener = %listener,
                        panic = %panic_message(panic.as_ref()),
                        "Event handler panicked"
                    );
                    report.failed.push(handler.name());
                }
            }
        }

        report
    }
}

impl EventSubscriber for InProcessEventRegistry {
    fn on(&self, event: &str, handler: Arc<dyn EventHandler>) -> ListenerId {
        let id = ListenerId::next();
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        tracing::trace!(event, handler = handler.name(), listener = %id, "Listener registered");
        handlers.entry(event.to_string()).or_default().push((id, handler));
        id
    }

    fn off(&self, event: &str, listener: ListenerId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = handlers.get_mut(event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != listener);
        let removed = listeners.len() < before;
        if listeners.is_empty() {
            handlers.remove(event);
        }
        removed
    }

    fn remove_all_listeners(&self, event: &str) -> usize {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(event)
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
