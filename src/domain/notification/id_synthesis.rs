//! Client-side ID synthesis for payloads that arrive without an ID.
//!
//! This is a best-effort uniqueness heuristic. Under `Timestamped` two
//! distinct events never share an ID (a per-process sequence breaks ties
//! within the same nanosecond), so genuinely repeated server emissions are
//! caught by the content window, not by ID equality. `EntityScoped` makes
//! every event about the same entity collide by ID, which suppresses
//! repeats for the whole store lifetime.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::foundation::{NotificationId, Timestamp};

/// How IDs are built when the server omits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `{event}-{entity}-{unix_nanos}-{seq}`
    #[default]
    Timestamped,
    /// `{event}-{entity}`
    EntityScoped,
}

/// Builds notification IDs according to an [`IdStrategy`].
#[derive(Debug, Default)]
pub struct IdSynthesizer {
    strategy: IdStrategy,
    sequence: AtomicU64,
}

impl IdSynthesizer {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Synthesizes an ID for `event` about `entity_id`, as of `at`.
    ///
    /// A missing entity ID is replaced by a random UUID, so such events can
    /// only ever be deduplicated by content.
    pub fn synthesize(&self, event: &str, entity_id: Option<&str>, at: Timestamp) -> NotificationId {
        let entity = match entity_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };

        match self.strategy {
            IdStrategy::Timestamped => {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
                NotificationId::new(format!("{}-{}-{}-{}", event, entity, at.as_unix_nanos(), seq))
            }
            IdStrategy::EntityScoped => NotificationId::new(format!("{}-{}", event, entity)),
        }
    }
}
