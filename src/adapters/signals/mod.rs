//! UI signal sinks.

mod broadcast;

pub use broadcast::BroadcastSignalSink;
