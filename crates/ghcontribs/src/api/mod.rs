//! API interaction layer: retry policy, query execution, errors, and call
//! accounting.
//!
//! These modules handle everything between the contribution fetcher and the
//! [`Transport`](crate::Transport):
//!
//! - [`retry`]: capped exponential backoff and the retryable status set
//!   (500, 502, 503, 504).
//! - [`executor`]: [`QueryExecutor`] runs one logical request through the
//!   attempt loop and classifies every response into a
//!   [`QueryOutcome`](executor::QueryOutcome).
//! - [`error`]: [`ApiError`] and the human-readable GraphQL error dump.
//! - [`stats`]: cumulative [`CallStats`] for the end-of-run log line.

pub mod error;
pub mod executor;
pub mod retry;
pub mod stats;

// Re-export commonly used items at the module level.
pub use error::ApiError;
pub use executor::{QueryExecutor, QueryOutcome};
pub use retry::RetryConfig;
pub use stats::CallStats;
