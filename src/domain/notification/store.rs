//! NotificationStore - shared, observable handle over the inbox.
//!
//! The store is the only way to mutate notifications. Readers get
//! immutable [`NotificationSnapshot`]s, either on demand or pushed through
//! a `watch` channel after every change that altered state.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tokio::sync::watch;

use crate::domain::foundation::{NotificationId, Timestamp};

use super::{AddOutcome, DedupPolicy, Notification, NotificationCategory, NotificationInbox};

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSnapshot {
    /// Most recent first.
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub last_activity: Option<Timestamp>,
}

impl NotificationSnapshot {
    fn of(inbox: &NotificationInbox) -> Self {
        Self {
            notifications: inbox.iter().cloned().collect(),
            unread_count: inbox.unread_count(),
            last_activity: inbox.last_activity(),
        }
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

/// Process-wide notification state shared by adapters and UI readers.
pub struct NotificationStore {
    inbox: RwLock<NotificationInbox>,
    changes: watch::Sender<Arc<NotificationSnapshot>>,
}

impl NotificationStore {
    pub fn new(policy: DedupPolicy) -> Self {
        let (changes, _) = watch::channel(Arc::new(NotificationSnapshot::default()));
        Self {
            inbox: RwLock::new(NotificationInbox::new(policy)),
            changes,
        }
    }

    /// Create as an Arc (for sharing with adapters).
    pub fn new_shared(policy: DedupPolicy) -> Arc<Self> {
        Arc::new(Self::new(policy))
    }

    /// Offers a notification. Duplicates are dropped silently.
    pub fn add(&self, notification: Notification) -> AddOutcome {
        let id = notification.id.clone();
        let mut inbox = self.write();
        let outcome = inbox.add(notification);

        match &outcome {
            AddOutcome::Accepted { evicted } => {
                if let Some(evicted) = evicted {
                    tracing::debug!(evicted = %evicted, "Notification evicted at capacity");
                }
                self.publish(&inbox);
            }
            AddOutcome::DuplicateId => {
                tracing::debug!(id = %id, "Dropping notification with duplicate id");
            }
            AddOutcome::DuplicateContent { existing } => {
                tracing::debug!(
                    id = %id,
                    existing = %existing,
                    "Dropping notification duplicating recent content"
                );
            }
        }

        outcome
    }

    /// Offers a batch oldest-first so the newest ends up at the front.
    ///
    /// `batch` is expected most-recent-first, the order the REST feed uses.
    /// Returns how many were accepted.
    pub fn add_many<I>(&self, batch: I) -> usize
    where
        I: IntoIterator<Item = Notification>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut inbox = self.write();
        let accepted = batch
            .into_iter()
            .rev()
            .map(|n| inbox.add(n))
            .filter(AddOutcome::is_accepted)
            .count();
        if accepted > 0 {
            self.publish(&inbox);
        }
        accepted
    }

    pub fn mark_as_read(&self, id: &NotificationId) -> bool {
        let mut inbox = self.write();
        let changed = inbox.mark_as_read(id);
        if changed {
            self.publish(&inbox);
        }
        changed
    }

    pub fn mark_all_as_read(&self) -> usize {
        let mut inbox = self.write();
        let changed = inbox.mark_all_as_read();
        if changed > 0 {
            self.publish(&inbox);
        }
        changed
    }

    pub fn remove(&self, id: &NotificationId) -> bool {
        let mut inbox = self.write();
        let removed = inbox.remove(id).is_some();
        if removed {
            self.publish(&inbox);
        }
        removed
    }

    pub fn clear(&self) -> usize {
        let mut inbox = self.write();
        let dropped = inbox.clear();
        if dropped > 0 {
            self.publish(&inbox);
        }
        dropped
    }

    // === Readers ===

    pub fn snapshot(&self) -> NotificationSnapshot {
        NotificationSnapshot::of(&self.read())
    }

    /// Receiver that yields a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<NotificationSnapshot>> {
        self.changes.subscribe()
    }

    pub fn unread_count(&self) -> usize {
        self.read().unread_count()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.read().get(id).cloned()
    }

    pub fn by_category(&self, category: NotificationCategory) -> Vec<Notification> {
        self.read().by_category(category)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, NotificationInbox> {
        self.inbox.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NotificationInbox> {
        self.inbox.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inbox: &NotificationInbox) {
        self.changes
            .send_replace(Arc::new(NotificationSnapshot::of(inbox)));
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}
