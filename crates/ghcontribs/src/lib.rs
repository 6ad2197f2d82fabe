//! Per-day, per-repository GitHub commit contribution reports.
//!
//! `ghcontribs` polls the GitHub GraphQL API once per calendar day in a date
//! range and reconciles the results into a dense repository × day table.
//!
//! # Getting started
//!
//! ```ignore
//! use ghcontribs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ghcontribs::Error> {
//!     let token = resolve_token()?;
//!     let config = ReportConfig::default().with_days(14);
//!     let today = chrono::Local::now().date_naive();
//!     let table = run_report(&config, &token, today, chrono::Local).await?;
//!     println!("{table}");
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Talking to the API:** [`HttpTransport`] owns the HTTP session and sends
//!   a [`QueryRequest`]; [`QueryExecutor`](api::executor::QueryExecutor) wraps
//!   any [`Transport`] with retry and response classification.
//! - **Fetching one day:** [`ContributionFetcher`](contribs::fetch::ContributionFetcher)
//!   runs the guess-then-correct protocol.
//! - **Building the table:** [`ContribTabulator`](contribs::tabulate::ContribTabulator)
//!   accumulates snapshots; [`DateRange`](contribs::dates::DateRange) yields
//!   the per-day windows; [`contribs::collect`] ties them together.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Retry policy, query executor, error taxonomy, call statistics |
//! | [`contribs`] | Date windows, adaptive fetcher, sparse tabulator, report driver |
//! | [`table`] | Bordered text grid and alternate-row highlighting |
//! | [`config`] | [`ReportConfig`](config::ReportConfig) |
//! | [`token`] | GitHub token discovery |
//! | [`reaction`] | GitHub reaction kinds and their wire tokens |

pub mod api;
pub mod config;
pub mod contribs;
pub mod prelude;
pub mod reaction;
pub mod table;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub use api::error::ApiError;
pub use config::ReportConfig;
pub use contribs::run_report;
pub use reaction::ValidationError;
pub use token::{ConfigError, resolve_token};

// ── Constants ──────────────────────────────────────────────────────

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default `User-Agent` header; GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("ghcontribs/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ── Errors ─────────────────────────────────────────────────────────

/// Any failure that aborts a report run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(TransportError),
}

/// A request that failed before an HTTP status was obtained.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

// ── Request types ──────────────────────────────────────────────────

/// A GraphQL document plus its variables. Serializes to the
/// `{"query": ..., "variables": {...}}` request body.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub variables: serde_json::Map<String, Value>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: serde_json::Map::new(),
        }
    }

    /// Set a variable, replacing any previous value under the same name.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ── Transport ──────────────────────────────────────────────────────

/// Boxed future returned by [`Transport::post`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + 'a>>;

/// Sends one GraphQL request and returns the raw HTTP exchange.
///
/// Implementations do no retrying or status interpretation; that is the
/// executor's job.
pub trait Transport: Send + Sync {
    fn post<'a>(&'a self, request: &'a QueryRequest) -> TransportFuture<'a>;
}

/// HTTP session against a single GraphQL endpoint.
///
/// The underlying connection pool lives as long as this value and is released
/// when it is dropped.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
}

impl HttpTransport {
    /// Create a transport against the public GitHub endpoint.
    pub fn new(token: &str) -> Result<Self, TransportError> {
        Self::with_endpoint(token, GITHUB_GRAPHQL_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Create a transport against a custom endpoint.
    ///
    /// Fails without touching the network when the endpoint is not a URL or
    /// the token cannot be sent as a header value.
    pub fn with_endpoint(
        token: &str,
        endpoint: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| TransportError(format!("invalid endpoint {endpoint:?}: {e}")))?;
        let mut authorization =
            HeaderValue::from_str(&format!("bearer {token}")).map_err(|_| {
                TransportError("token contains characters not allowed in an HTTP header".into())
            })?;
        authorization.set_sensitive(true);
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            authorization,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl Transport for HttpTransport {
    fn post<'a>(&'a self, request: &'a QueryRequest) -> TransportFuture<'a> {
        Box::pin(async move {
            debug!(
                "GraphQL request: endpoint={}, variables={}",
                self.endpoint,
                serde_json::to_string(&request.variables).unwrap_or_default(),
            );
            trace!(
                "Request payload size: {} bytes",
                serde_json::to_string(request).map_or(0, |s| s.len())
            );

            let start = Instant::now();

            let resp = self
                .client
                .post(self.endpoint.clone())
                .header(AUTHORIZATION, self.authorization.clone())
                .header(ACCEPT, "application/json")
                .json(request)
                .send()
                .await
                .map_err(|e| TransportError(format!("request failed: {e}")))?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| TransportError(format!("failed to read response: {e}")))?;

            debug!(
                "GraphQL response: HTTP {} in {:.1}s ({} bytes)",
                status,
                start.elapsed().as_secs_f64(),
                body.len()
            );

            Ok(RawResponse::new(status.as_u16(), body))
        })
    }
}
