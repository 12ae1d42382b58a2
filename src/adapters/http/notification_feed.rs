//! reqwest implementation of the paginated notification feed.
//!
//! `GET {base_url}/notifications?page={page}&limit={limit}` with bearer
//! auth. The backend has shipped several envelope shapes over time, so the
//! item list and pagination are looked up leniently:
//!
//! | Items                  | Total pages                    |
//! |------------------------|--------------------------------|
//! | `data.notifications`   | `data.pagination.totalPages`   |
//! | `notifications`        | `pagination.totalPages`        |
//! | `data` / `items`       | `totalPages`                   |
//! | top-level array        | (single page)                  |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;

use crate::domain::foundation::PayloadReader;
use crate::domain::notification::{parse_server_notification, IdSynthesizer, Placeholders};
use crate::ports::{FeedError, NotificationFeed, NotificationPage};

const ITEM_PATHS: &[&str] = &["data.notifications", "notifications", "data", "items"];
const TOTAL_PAGE_PATHS: &[&str] = &[
    "data.pagination.totalPages",
    "pagination.totalPages",
    "totalPages",
    "data.pagination.pages",
    "pagination.pages",
];

/// Fetches notification pages from the REST backend.
pub struct HttpNotificationFeed {
    client: reqwest::Client,
    base_url: String,
    placeholders: Placeholders,
    ids: Arc<IdSynthesizer>,
}

impl HttpNotificationFeed {
    /// Create a feed client for `base_url` (e.g. `https://api.example.com/api`).
    ///
    /// `ids` should be the synthesizer the domain adapters use, so REST and
    /// realtime entries follow one ID strategy.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        placeholders: Placeholders,
        ids: Arc<IdSynthesizer>,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            placeholders,
            ids,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/notifications", self.base_url)
    }

    /// Turns a decoded response body into a page.
    fn parse_page(&self, body: &JsonValue, page: u32) -> NotificationPage {
        let reader = PayloadReader::new(body);

        let items = body.as_array().or_else(|| {
            ITEM_PATHS
                .iter()
                .find_map(|path| reader.value(path).and_then(JsonValue::as_array))
        });

        let items = items
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.is_object())
                    .map(|record| {
                        parse_server_notification(record, &self.placeholders, |at| {
                            self.ids.synthesize("notification", None, at)
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total_pages = reader
            .number(TOTAL_PAGE_PATHS)
            .map(|n| n.max(0.0) as u32)
            .unwrap_or(page);

        NotificationPage {
            items,
            page,
            total_pages,
        }
    }
}

#[async_trait]
impl NotificationFeed for HttpNotificationFeed {
    async fn fetch_page(
        &self,
        token: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<NotificationPage, FeedError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("page", page), ("limit", limit)])
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(FeedError::Unauthorized)
            }
            status if !status.is_success() => return Err(FeedError::Status(status.as_u16())),
            _ => {}
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;

        let parsed = self.parse_page(&body, page);
        tracing::debug!(
            page,
            total_pages = parsed.total_pages,
            items = parsed.items.len(),
            "Fetched notification page"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::IdStrategy;
    use serde_json::json;

    fn feed() -> HttpNotificationFeed {
        feed_with(IdStrategy::Timestamped)
    }

    fn feed_with(strategy: IdStrategy) -> HttpNotificationFeed {
        HttpNotificationFeed::new(
            "http://localhost:5000/api/",
            Duration::from_secs(5),
            Placeholders::default(),
            Arc::new(IdSynthesizer::new(strategy)),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        assert_eq!(feed().endpoint(), "http://localhost:5000/api/notifications");
    }

    #[test]
    fn parses_nested_data_envelope() {
        let body = json!({
            "success": true,
            "data": {
                "notifications": [
                    {"_id": "a", "title": "A"},
                    {"_id": "b", "title": "B"}
                ],
                "pagination": {"page": 1, "totalPages": 3}
            }
        });

        let page = feed().parse_page(&body, 1);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.as_str(), "a");
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());
    }

    #[test]
    fn parses_bare_array_as_single_page() {
        let body = json!([{"_id": "x", "title": "X"}, "garbage", {"title": "no id"}]);

        let page = feed().parse_page(&body, 1);

        assert_eq!(page.items.len(), 2);
        assert!(page.items[1].id.as_str().starts_with("notification-"));
        assert!(!page.has_more());
    }

    #[test]
    fn synthesized_ids_follow_injected_strategy() {
        let body = json!([{"title": "no id"}]);

        let page = feed_with(IdStrategy::EntityScoped).parse_page(&body, 1);

        let id = page.items[0].id.as_str();
        assert!(id.starts_with("notification-"));
        assert_eq!(id.matches('-').count(), 1, "no timestamp segment in {id}");
    }

    #[test]
    fn unknown_shape_yields_empty_page() {
        let page = feed().parse_page(&json!({"ok": true}), 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 2);
    }
}
