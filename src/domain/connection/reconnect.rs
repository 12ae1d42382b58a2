//! Reconnection policy: bounded attempts with linear, capped backoff.

use std::time::Duration;

/// Decides whether and when to try again after a dropped connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts allowed after a failure before giving up. Default: 5
    pub max_attempts: u32,

    /// Delay multiplied by the attempt number. Default: 1s
    pub base_delay: Duration,

    /// Upper bound on any single delay. Default: 5s
    pub max_delay: Duration,

    /// Whether a rejected token is retried like any other failure.
    pub retry_on_auth_failure: bool,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            retry_on_auth_failure: false,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnection attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(attempt.max(1))
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Returns the delay for the next attempt, or `None` once `failures`
    /// consecutive failures have used up the budget.
    pub fn next_delay(&self, failures: u32) -> Option<Duration> {
        if failures >= self.max_attempts {
            None
        } else {
            Some(self.delay_for(failures + 1))
        }
    }
}
