//! Convenience re-exports for common `ghcontribs` types.
//!
//! ```ignore
//! use ghcontribs::prelude::*;
//! ```

// ── Transport and requests ──────────────────────────────────────────
pub use crate::{Error, HttpTransport, QueryRequest, RawResponse, Transport, TransportError};

// ── Execution ───────────────────────────────────────────────────────
pub use crate::api::{ApiError, CallStats, QueryExecutor, QueryOutcome, RetryConfig};

// ── Reporting ───────────────────────────────────────────────────────
pub use crate::config::ReportConfig;
pub use crate::contribs::dates::{DateRange, DayWindow};
pub use crate::contribs::fetch::{ContributionFetcher, ContributionSnapshot};
pub use crate::contribs::tabulate::ContribTabulator;
pub use crate::contribs::{collect, run_report};
pub use crate::table::{TextTable, highlight_alternate_rows};
pub use crate::token::{ConfigError, resolve_token};
