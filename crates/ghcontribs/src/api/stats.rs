//! Cumulative request accounting for a report run.
//!
//! Tracks how many physical HTTP attempts were made, how many of them were
//! retries, and how long the executor spent sleeping between them.

use std::time::Duration;

/// Cumulative call statistics for one executor.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CallStats {
    /// Logical requests passed to `execute`.
    pub requests: u64,
    /// Physical attempts, including retries.
    pub attempts: u64,
    /// Attempts that were retries of an earlier failure.
    pub retries: u64,
    /// Total backoff time.
    pub slept: Duration,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a logical request.
    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    /// Record one physical attempt.
    pub fn record_attempt(&mut self, is_retry: bool) {
        self.attempts += 1;
        if is_retry {
            self.retries += 1;
        }
    }

    /// Record a backoff sleep.
    pub fn record_backoff(&mut self, delay: Duration) {
        self.slept += delay;
    }

    /// Format as a short summary string.
    pub fn summary(&self) -> String {
        format!(
            "requests: {}, attempts: {} ({} retries), backoff: {:.1}s",
            self.requests,
            self.attempts,
            self.retries,
            self.slept.as_secs_f64(),
        )
    }
}
