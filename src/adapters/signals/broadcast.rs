//! Broadcast fan-out of UI signals.
//!
//! Any number of UI components can subscribe; each gets every signal sent
//! after it subscribed. Slow receivers lag and lose the oldest signals
//! rather than blocking the adapters.

use tokio::sync::broadcast;

use crate::ports::{UiSignal, UiSignalSink};

/// [`UiSignalSink`] backed by a `tokio::sync::broadcast` channel.
#[derive(Debug, Clone)]
pub struct BroadcastSignalSink {
    sender: broadcast::Sender<UiSignal>,
}

impl BroadcastSignalSink {
    /// Create a sink buffering up to `capacity` signals per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Create with default capacity (128 signals).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiSignal> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSignalSink {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl UiSignalSink for BroadcastSignalSink {
    fn signal(&self, signal: UiSignal) {
        tracing::trace!(?signal, "UI signal");
        // No receivers is fine
        let _ = self.sender.send(signal);
    }
}
