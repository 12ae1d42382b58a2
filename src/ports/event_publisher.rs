//! EventPublisher port - Interface for fanning realtime events out.
//!
//! The transport hands every received (or locally generated lifecycle)
//! event to a publisher. Handler failures never travel back to the caller.

use crate::domain::foundation::RealtimeEvent;

/// Summary of one `emit` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Handlers that were invoked.
    pub invoked: usize,

    /// Names of handlers that returned an error or panicked.
    pub failed: Vec<&'static str>,
}

impl EmitReport {
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failed.len()
    }
}

/// Port for emitting realtime events to registered handlers.
///
/// Implementations must ensure:
/// - Handlers run synchronously in registration order
/// - A failing handler does not stop later handlers
/// - No handler error is returned to the caller
pub trait EventPublisher: Send + Sync {
    fn emit(&self, event: RealtimeEvent) -> EmitReport;
}
