//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the realtime core and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Fan a named event out to handlers
//! - `EventSubscriber` - Register and remove handlers per event name
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Transport Ports
//!
//! - `Connector` / `TransportSession` - The physical push connection
//!
//! ## Collaborator Ports
//!
//! - `NotificationFeed` - Paginated REST fallback for the initial list
//! - `UiSignalSink` - Side effects that bypass the notification store

mod event_publisher;
mod event_subscriber;
mod notification_feed;
mod transport;
mod ui_signal;

pub use event_publisher::{EmitReport, EventPublisher};
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use notification_feed::{FeedError, NotificationFeed, NotificationPage};
pub use transport::{ConnectRequest, Connector, TransportError, TransportSession};
pub use ui_signal::{ResourceKind, UiSignal, UiSignalSink};
