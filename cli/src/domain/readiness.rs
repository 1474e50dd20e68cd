//! Readiness poll policy: bounded exponential backoff with a wait budget.

use std::time::Duration;

/// How long and how often to look for the started container.
///
/// The first observation happens immediately; each further observation is
/// preceded by a sleep that doubles from `initial_delay`, capped at
/// `max_delay`. The total time slept never exceeds `max_wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_wait: Duration,
}

impl Default for ReadinessPolicy {
    /// Two observations, one three-second sleep between them.
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            max_wait: Duration::from_secs(60),
        }
    }
}

impl ReadinessPolicy {
    /// Sleeps between consecutive observations, in order.
    ///
    /// The result has at most `max_attempts - 1` entries and sums to at most
    /// `max_wait`, so the poll is always bounded.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        let mut out = Vec::new();
        let mut remaining = self.max_wait;
        let mut delay = self.initial_delay;
        for _ in 1..self.max_attempts.max(1) {
            if remaining.is_zero() {
                break;
            }
            let step = delay.min(self.max_delay).min(remaining);
            out.push(step);
            remaining = remaining.saturating_sub(step);
            delay = delay.saturating_mul(2);
        }
        out
    }
}
