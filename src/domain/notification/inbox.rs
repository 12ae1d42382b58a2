//! NotificationInbox - the bounded, deduplicated, most-recent-first list.
//!
//! Pure state with no locking or I/O. `NotificationStore` wraps it for
//! shared access. Every mutation keeps `unread_count` equal to the number
//! of unread entries by adjusting it incrementally.

use std::collections::{HashSet, VecDeque};

use crate::domain::foundation::{NotificationId, Timestamp};

use super::{DedupPolicy, Notification, NotificationCategory};

/// Result of offering a notification to the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Inserted at the front. `evicted` names the tail entry dropped to stay
    /// within capacity, if any.
    Accepted { evicted: Option<NotificationId> },

    /// An entry with the same ID is already held.
    DuplicateId,

    /// A content-equal entry created within the dedup window is already held.
    DuplicateContent { existing: NotificationId },
}

impl AddOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AddOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NotificationInbox {
    entries: VecDeque<Notification>,
    ids: HashSet<NotificationId>,
    unread_count: usize,
    last_activity: Option<Timestamp>,
    policy: DedupPolicy,
}

impl NotificationInbox {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            entries: VecDeque::with_capacity(policy.capacity),
            ids: HashSet::with_capacity(policy.capacity),
            unread_count: 0,
            last_activity: None,
            policy,
        }
    }

    pub fn policy(&self) -> &DedupPolicy {
        &self.policy
    }

    /// Inserts at the front unless the ID or the content is a duplicate.
    pub fn add(&mut self, notification: Notification) -> AddOutcome {
        if self.ids.contains(&notification.id) {
            return AddOutcome::DuplicateId;
        }

        if let Some(existing) = self.find_content_duplicate(&notification) {
            return AddOutcome::DuplicateContent {
                existing: existing.id.clone(),
            };
        }

        if !notification.is_read {
            self.unread_count += 1;
        }
        self.ids.insert(notification.id.clone());
        self.entries.push_front(notification);
        self.last_activity = Some(Timestamp::now());

        let evicted = if self.entries.len() > self.policy.capacity {
            self.entries.pop_back().map(|old| {
                self.forget(&old);
                old.id
            })
        } else {
            None
        };

        AddOutcome::Accepted { evicted }
    }

    /// Marks one entry read. Returns false if absent or already read.
    pub fn mark_as_read(&mut self, id: &NotificationId) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|n| &n.id == id) else {
            return false;
        };
        if entry.is_read {
            return false;
        }
        entry.is_read = true;
        self.unread_count = self.unread_count.saturating_sub(1);
        self.last_activity = Some(Timestamp::now());
        true
    }

    /// Marks every entry read. Returns how many entries changed.
    pub fn mark_all_as_read(&mut self) -> usize {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|n| !n.is_read) {
            entry.is_read = true;
            changed += 1;
        }
        self.unread_count = 0;
        if changed > 0 {
            self.last_activity = Some(Timestamp::now());
        }
        changed
    }

    /// Removes one entry. Returns the removed notification if present.
    pub fn remove(&mut self, id: &NotificationId) -> Option<Notification> {
        let index = self.entries.iter().position(|n| &n.id == id)?;
        let removed = self.entries.remove(index)?;
        self.forget(&removed);
        self.last_activity = Some(Timestamp::now());
        Some(removed)
    }

    /// Empties the inbox. Returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.ids.clear();
        self.unread_count = 0;
        if dropped > 0 {
            self.last_activity = Some(Timestamp::now());
        }
        dropped
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_activity(&self) -> Option<Timestamp> {
        self.last_activity
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| &n.id == id)
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn by_category(&self, category: NotificationCategory) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|n| n.category == category)
            .cloned()
            .collect()
    }

    fn find_content_duplicate(&self, candidate: &Notification) -> Option<&Notification> {
        self.entries.iter().find(|existing| {
            existing.same_content_as(candidate)
                && existing.created_at.distance(&candidate.created_at) < self.policy.window
        })
    }

    fn forget(&mut self, entry: &Notification) {
        self.ids.remove(&entry.id);
        if !entry.is_read {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
    }
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset_ms: i64) -> Timestamp {
        Timestamp::parse("2024-05-01T08:00:00Z")
            .unwrap()
            .plus_millis(offset_ms)
    }

    fn note(id: &str, offset_ms: i64) -> Notification {
        Notification::new(id, format!("title {}", id), "body").with_created_at(at(offset_ms))
    }

    fn unread_in(inbox: &NotificationInbox) -> usize {
        inbox.iter().filter(|n| !n.is_read).count()
    }

    #[test]
    fn add_inserts_most_recent_first() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        inbox.add(note("b", 10));

        let ids: Vec<_> = inbox.iter().map(|n| n.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(inbox.unread_count(), 2);
        assert!(inbox.last_activity().is_some());
    }

    #[test]
    fn duplicate_id_is_a_no_op() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));

        let outcome = inbox.add(Notification::new("a", "other", "other"));

        assert_eq!(outcome, AddOutcome::DuplicateId);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn content_duplicate_within_window_is_dropped() {
        let mut inbox = NotificationInbox::default();
        let first = Notification::new("a", "Fire", "An reported a fire").with_created_at(at(0));
        let second = Notification::new("b", "Fire", "An reported a fire").with_created_at(at(4_000));

        inbox.add(first);
        let outcome = inbox.add(second);

        assert_eq!(
            outcome,
            AddOutcome::DuplicateContent {
                existing: NotificationId::new("a")
            }
        );
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn content_duplicate_beyond_window_is_kept() {
        let mut inbox = NotificationInbox::default();
        inbox.add(Notification::new("a", "Fire", "m").with_created_at(at(0)));
        let outcome = inbox.add(Notification::new("b", "Fire", "m").with_created_at(at(6_000)));

        assert!(outcome.is_accepted());
        assert_eq!(inbox.len(), 2);
    }

    #[test]
    fn same_text_in_other_category_is_not_a_duplicate() {
        let mut inbox = NotificationInbox::default();
        inbox.add(Notification::new("a", "T", "M").with_created_at(at(0)));
        let outcome = inbox.add(
            Notification::new("b", "T", "M")
                .with_created_at(at(0))
                .with_category(NotificationCategory::Ppe),
        );

        assert!(outcome.is_accepted());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut inbox = NotificationInbox::default();
        for i in 0..60 {
            inbox.add(note(&format!("n{}", i), i * 10));
        }

        assert_eq!(inbox.len(), 50);
        assert_eq!(inbox.iter().next().unwrap().id.as_str(), "n59");
        assert_eq!(inbox.iter().last().unwrap().id.as_str(), "n10");
        assert!(inbox.get(&NotificationId::new("n9")).is_none());
        assert_eq!(inbox.unread_count(), 50);
    }

    #[test]
    fn evicted_id_may_be_added_again() {
        let mut inbox = NotificationInbox::new(DedupPolicy::default().with_capacity(2));
        inbox.add(note("a", 0));
        inbox.add(note("b", 10_000));
        let outcome = inbox.add(note("c", 20_000));
        assert_eq!(
            outcome,
            AddOutcome::Accepted {
                evicted: Some(NotificationId::new("a"))
            }
        );

        assert!(inbox.add(note("a", 30_000)).is_accepted());
    }

    #[test]
    fn eviction_of_read_entry_leaves_unread_count() {
        let mut inbox = NotificationInbox::new(DedupPolicy::default().with_capacity(2));
        inbox.add(note("a", 0));
        inbox.mark_as_read(&NotificationId::new("a"));
        inbox.add(note("b", 10_000));
        inbox.add(note("c", 20_000));

        assert_eq!(inbox.unread_count(), 2);
        assert_eq!(unread_in(&inbox), 2);
    }

    #[test]
    fn read_entries_do_not_count_as_unread_on_add() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0).read(true));
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn mark_as_read_is_idempotent() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        let id = NotificationId::new("a");

        assert!(inbox.mark_as_read(&id));
        assert!(!inbox.mark_as_read(&id));
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn mark_as_read_on_unknown_id_is_ignored() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));

        assert!(!inbox.mark_as_read(&NotificationId::new("gone")));
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn mark_all_as_read_on_empty_inbox() {
        let mut inbox = NotificationInbox::default();
        assert_eq!(inbox.mark_all_as_read(), 0);
        assert_eq!(inbox.unread_count(), 0);
        assert!(inbox.last_activity().is_none());
    }

    #[test]
    fn mark_all_as_read_reports_changed_entries() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        inbox.add(note("b", 10_000));
        inbox.mark_as_read(&NotificationId::new("a"));

        assert_eq!(inbox.mark_all_as_read(), 1);
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(unread_in(&inbox), 0);
    }

    #[test]
    fn remove_unread_decrements_count() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        inbox.add(note("b", 10_000));

        let removed = inbox.remove(&NotificationId::new("a"));

        assert_eq!(removed.map(|n| n.id), Some(NotificationId::new("a")));
        assert_eq!(inbox.unread_count(), 1);
        assert!(inbox.remove(&NotificationId::new("a")).is_none());
    }

    #[test]
    fn remove_read_entry_keeps_count() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        inbox.add(note("b", 10_000));
        inbox.mark_as_read(&NotificationId::new("b"));

        inbox.remove(&NotificationId::new("b"));

        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn clear_empties_and_zeroes() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0));
        inbox.add(note("b", 10_000));

        assert_eq!(inbox.clear(), 2);
        assert!(inbox.is_empty());
        assert_eq!(inbox.unread_count(), 0);
        assert!(inbox.add(note("a", 0)).is_accepted());
    }

    #[test]
    fn by_category_filters() {
        let mut inbox = NotificationInbox::default();
        inbox.add(note("a", 0).with_category(NotificationCategory::Training));
        inbox.add(note("b", 10_000));

        let training = inbox.by_category(NotificationCategory::Training);
        assert_eq!(training.len(), 1);
        assert_eq!(training[0].id.as_str(), "a");
    }
}
