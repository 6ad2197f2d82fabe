//! Capped exponential backoff for transient GraphQL failures.
//!
//! Retries HTTP 500, 502, 503 and 504 responses plus transport-level failures
//! (connection refused, timeouts). Every other non-success status is terminal.

use std::time::Duration;

/// HTTP statuses that indicate transient server state.
pub const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Total attempts per logical request, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 = no retries).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff base; the delay grows by this factor per attempt.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(1250),
            max_delay: Duration::from_secs(120),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Same attempt budget as the default, without any waiting between
    /// attempts.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Create a config with the given attempt budget and default delays.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Delay to wait after the failed attempt with the given zero-based index.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

/// Whether an HTTP status indicates a transient (retryable) failure.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_github_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(1250));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(2500));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(10));
    }

    #[test]
    fn delay_is_monotonic_and_capped() {
        let config = RetryConfig::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..40 {
            let delay = config.delay_for_attempt(attempt);
            assert!(delay >= previous, "attempt {attempt}: {delay:?} < {previous:?}");
            assert!(delay <= config.max_delay);
            previous = delay;
        }
        assert_eq!(config.delay_for_attempt(7), Duration::from_secs(120));
    }

    #[test]
    fn huge_attempt_index_stays_capped() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(u32::MAX), config.max_delay);
    }

    #[test]
    fn immediate_never_waits() {
        let config = RetryConfig::immediate();
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(4), Duration::ZERO);
    }

    #[test]
    fn with_attempts_keeps_at_least_one() {
        assert_eq!(RetryConfig::with_attempts(0).max_attempts, 1);
        assert_eq!(RetryConfig::with_attempts(3).max_attempts, 3);
    }

    #[test]
    fn retryable_statuses_detected() {
        for status in [500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{status}");
        }
        for status in [200, 400, 401, 403, 404, 422, 429, 501, 505] {
            assert!(!is_retryable_status(status), "{status}");
        }
    }
}
