//! Domain adapters.
//!
//! Each adapter is an `EventHandler` that translates one family of raw
//! realtime events into either a notification (through the shared
//! `AdapterContext`) or a `UiSignal`. They are registered once, as a set,
//! by `register_domain_adapters`.

mod connection;
mod context;
mod incident;
mod ppe;
mod presence;
mod project;
mod refetch;
mod registrations;
mod server_notification;
mod training;

pub use connection::ConnectionAdapter;
pub use context::AdapterContext;
pub use incident::IncidentAdapter;
pub use ppe::PpeAdapter;
pub use presence::PresenceAdapter;
pub use project::ProjectAdapter;
pub use refetch::RefetchAdapter;
pub use registrations::{register_domain_adapters, AdapterRegistrations};
pub use server_notification::ServerNotificationAdapter;
pub use training::TrainingAdapter;
