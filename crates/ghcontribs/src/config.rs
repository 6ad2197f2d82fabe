//! Report configuration with sensible defaults.
//!
//! [`ReportConfig`] captures everything a report run needs besides the token
//! and the clock. The CLI fills it from flags; tests point it at a local mock
//! endpoint with [`RetryConfig::immediate`].

use std::time::Duration;

use crate::api::retry::RetryConfig;
use crate::contribs::fetch::INITIAL_GUESS;
use crate::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, GITHUB_GRAPHQL_URL};

/// Default number of days shown, ending today.
pub const DEFAULT_DAYS: u32 = 7;

/// Configuration for a contributions report.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// GraphQL endpoint. Default: [`GITHUB_GRAPHQL_URL`].
    pub endpoint: String,
    /// Number of days back to show, including today. Default: `7`.
    pub days: u32,
    /// Color alternating rows of the table. Default: `false`.
    pub highlight: bool,
    /// Rows requested on the first query for each day. Default: `10`.
    pub initial_guess: u64,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Per-request timeout. Default: 60 seconds.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
            days: DEFAULT_DAYS,
            highlight: false,
            initial_guess: INITIAL_GUESS,
            retry: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the number of days; values below 1 are raised to 1.
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days.max(1);
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_initial_guess(mut self, initial_guess: u64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
