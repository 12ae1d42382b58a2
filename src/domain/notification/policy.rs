//! Capacity and deduplication settings for the notification inbox.

use chrono::Duration;

/// Bounds and duplicate-detection window applied on every `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupPolicy {
    /// Maximum entries kept; the oldest are evicted beyond this.
    pub capacity: usize,

    /// Two content-equal notifications whose `created_at` values are closer
    /// than this are treated as one.
    pub window: Duration,
}

impl DedupPolicy {
    pub const DEFAULT_CAPACITY: usize = 50;
    pub const DEFAULT_WINDOW_MS: i64 = 5_000;

    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            window,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_window_millis(mut self, millis: i64) -> Self {
        self.window = Duration::milliseconds(millis.max(0));
        self
    }
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            window: Duration::milliseconds(Self::DEFAULT_WINDOW_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_limits() {
        let policy = DedupPolicy::default();
        assert_eq!(policy.capacity, 50);
        assert_eq!(policy.window, Duration::seconds(5));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        assert_eq!(DedupPolicy::default().with_capacity(0).capacity, 1);
    }

    #[test]
    fn negative_window_is_clamped() {
        let policy = DedupPolicy::default().with_window_millis(-10);
        assert_eq!(policy.window, Duration::zero());
    }
}
