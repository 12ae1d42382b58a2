//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the realtime core to external systems:
//! - `events` - In-process event registry
//! - `websocket` - tokio-tungstenite push transport
//! - `http` - REST notification feed
//! - `signals` - UI signal fan-out

pub mod events;
pub mod http;
pub mod signals;
pub mod websocket;

pub use events::InProcessEventRegistry;
pub use http::HttpNotificationFeed;
pub use signals::BroadcastSignalSink;
pub use websocket::TungsteniteConnector;
