//! Notification module - the user-visible realtime feed.
//!
//! - `Notification` and its classification enums
//! - `NotificationInbox` - pure bounded/deduplicated list
//! - `NotificationStore` - shared, observable handle over the inbox
//! - `IdSynthesizer` - fallback IDs for payloads without one
//! - `parse_server_notification` - server record mapping shared by REST and push

mod id_synthesis;
mod inbox;
#[allow(clippy::module_inception)]
mod notification;
mod policy;
mod server;
mod store;

pub use id_synthesis::{IdStrategy, IdSynthesizer};
pub use inbox::{AddOutcome, NotificationInbox};
pub use notification::{
    Notification, NotificationCategory, NotificationPriority, NotificationType,
};
pub use policy::DedupPolicy;
pub use server::{parse_server_notification, Placeholders};
pub use store::{NotificationSnapshot, NotificationStore};
