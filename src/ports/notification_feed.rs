//! NotificationFeed port - paginated REST source of existing notifications.
//!
//! Used once per session to seed the store so a client that was offline
//! sees continuity rather than a gap.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::notification::Notification;

/// Errors raised while fetching the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(String),

    #[error("feed rejected credentials")]
    Unauthorized,

    #[error("feed returned status {0}")]
    Status(u16),

    #[error("feed response could not be decoded: {0}")]
    Decode(String),
}

/// One page of notifications, most recent first.
#[derive(Debug, Clone, Default)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    /// 1-based page number.
    pub page: u32,
    pub total_pages: u32,
}

impl NotificationPage {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

#[async_trait]
pub trait NotificationFeed: Send + Sync {
    async fn fetch_page(
        &self,
        token: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<NotificationPage, FeedError>;
}
