//! WebSocket adapters for the realtime push channel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Push server (WebSocket)                   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │ text frames
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ TungsteniteConnector / session                               │
//! │   - Bearer token in the upgrade request                      │
//! │   - ServerFrame → RealtimeEvent, malformed frames skipped    │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                     ConnectionManager → registry
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol types
//! - [`connector`] - `Connector`/`TransportSession` over tokio-tungstenite

pub mod connector;
pub mod messages;

pub use connector::TungsteniteConnector;
pub use messages::{ClientMessage, FrameError, ServerFrame};
