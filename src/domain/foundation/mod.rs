//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the realtime event envelope and
//! error types shared by the transport, registry and store.

mod errors;
mod events;
mod ids;
mod payload;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, TransitionError};
pub use events::{is_known_event, names, RealtimeEvent, ALL_EVENTS};
pub use ids::{ListenerId, NotificationId};
pub use payload::PayloadReader;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
