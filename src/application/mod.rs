//! Application layer - domain adapters, connection management, and the
//! service object that wires them together.
//!
//! ```text
//! Connector ─► ConnectionManager ─► EventBus ─► domain adapters ─► NotificationStore
//!                                                      └──────────► UiSignalSink
//! ```

pub mod connection_manager;
pub mod handlers;
pub mod service;

pub use connection_manager::{ConnectionConfig, ConnectionManager};
pub use handlers::{
    register_domain_adapters, AdapterContext, AdapterRegistrations, ConnectionAdapter,
    IncidentAdapter, PpeAdapter, PresenceAdapter, ProjectAdapter, RefetchAdapter,
    ServerNotificationAdapter, TrainingAdapter,
};
pub use service::RealtimeService;
