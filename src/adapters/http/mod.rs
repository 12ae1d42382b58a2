//! HTTP adapters.
//!
//! - `HttpNotificationFeed` - REST fallback for the initial notification list

mod notification_feed;

pub use notification_feed::HttpNotificationFeed;
