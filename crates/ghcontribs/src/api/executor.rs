//! Resilient GraphQL query execution.
//!
//! [`QueryExecutor`] sends a [`QueryRequest`] through a [`Transport`],
//! classifies each attempt into a [`QueryOutcome`], and either returns the
//! `data` payload, sleeps and retries, or gives up with an [`ApiError`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::ApiError;
use super::retry::{RetryConfig, is_retryable_status};
use super::stats::CallStats;
use crate::{QueryRequest, RawResponse, Transport, TransportError};

/// Classification of a single network attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The `data` object of a successful response.
    Success(Map<String, Value>),
    /// 500, 502, 503 or 504; eligible for retry.
    TransientServerError { status: u16, body: String },
    /// Any non-success status below 500.
    ClientError { status: u16, body: String },
    /// A 5xx status outside the retryable set.
    ServerError { status: u16, body: String },
    /// HTTP success carrying a non-empty GraphQL `errors` array.
    GraphQlError(Vec<Value>),
    /// No HTTP response was obtained; eligible for retry.
    TransportError(String),
    /// HTTP success with a body that is not a GraphQL result.
    Malformed(String),
}

impl QueryOutcome {
    /// Classify the result of one [`Transport::post`] call.
    pub fn classify(result: Result<RawResponse, TransportError>) -> Self {
        let resp = match result {
            Ok(resp) => resp,
            Err(e) => return QueryOutcome::TransportError(e.0),
        };

        if is_retryable_status(resp.status) {
            return QueryOutcome::TransientServerError {
                status: resp.status,
                body: resp.body,
            };
        }
        if !resp.is_success() {
            return if resp.status >= 500 {
                QueryOutcome::ServerError {
                    status: resp.status,
                    body: resp.body,
                }
            } else {
                QueryOutcome::ClientError {
                    status: resp.status,
                    body: resp.body,
                }
            };
        }

        let parsed: Value = match serde_json::from_str(&resp.body) {
            Ok(v) => v,
            Err(e) => return QueryOutcome::Malformed(format!("invalid JSON body: {e}")),
        };
        let Value::Object(mut obj) = parsed else {
            return QueryOutcome::Malformed("response body is not a JSON object".into());
        };

        match obj.remove("errors") {
            Some(errors) if is_blank(&errors) => {}
            Some(Value::Array(errors)) => return QueryOutcome::GraphQlError(errors),
            Some(other) => return QueryOutcome::GraphQlError(vec![other]),
            None => {}
        }

        match obj.remove("data") {
            Some(Value::Object(data)) => QueryOutcome::Success(data),
            Some(_) => QueryOutcome::Malformed("`data` is not an object".into()),
            None => QueryOutcome::Malformed("response has no `data` field".into()),
        }
    }

    /// Whether another attempt may change the result.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QueryOutcome::TransientServerError { .. } | QueryOutcome::TransportError(_)
        )
    }

    /// Convert a non-success outcome into the terminal error, given how many
    /// attempts were spent. Returns `Ok` for [`QueryOutcome::Success`].
    pub fn into_result(self, attempts: u32) -> Result<Map<String, Value>, ApiError> {
        match self {
            QueryOutcome::Success(data) => Ok(data),
            QueryOutcome::TransientServerError { status, body }
            | QueryOutcome::ServerError { status, body } => Err(ApiError::ServerError {
                status,
                body,
                attempts,
            }),
            QueryOutcome::ClientError { status, body } => {
                Err(ApiError::ClientError { status, body })
            }
            QueryOutcome::GraphQlError(errors) => Err(ApiError::GraphQl(errors)),
            QueryOutcome::TransportError(message) => {
                Err(ApiError::Transport { message, attempts })
            }
            QueryOutcome::Malformed(message) => Err(ApiError::Malformed(message)),
        }
    }
}

/// An `errors` value that carries nothing: null, false, zero, or an empty
/// string, array or object.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Sends GraphQL requests with bounded, backed-off retries.
///
/// Owns its transport: the HTTP session is created with the executor and
/// released when the executor is dropped.
pub struct QueryExecutor<T: Transport> {
    transport: T,
    retry: RetryConfig,
    stats: CallStats,
}

impl<T: Transport> QueryExecutor<T> {
    /// Create an executor with the default retry policy.
    pub fn new(transport: T) -> Self {
        Self::with_retry(transport, RetryConfig::default())
    }

    pub fn with_retry(transport: T, retry: RetryConfig) -> Self {
        Self {
            transport,
            retry,
            stats: CallStats::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn stats(&self) -> &CallStats {
        &self.stats
    }

    /// Run `request` to completion and return its `data` object.
    ///
    /// Transient failures are retried up to `max_attempts` total attempts;
    /// everything else fails on the spot.
    pub async fn execute(&mut self, request: &QueryRequest) -> Result<Map<String, Value>, ApiError> {
        self.stats.record_request();
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            self.stats.record_attempt(attempt > 0);
            let outcome = QueryOutcome::classify(self.transport.post(request).await);
            attempt += 1;

            if !outcome.is_transient() {
                if let QueryOutcome::Success(_) = outcome {
                    debug!("GraphQL query succeeded on attempt {attempt}/{max_attempts}");
                }
                return outcome.into_result(attempt);
            }

            if attempt >= max_attempts {
                warn!("GraphQL query still failing after {attempt} attempt(s), giving up");
                return outcome.into_result(attempt);
            }

            let delay = self.retry.delay_for_attempt(attempt - 1);
            match &outcome {
                QueryOutcome::TransientServerError { status, .. } => warn!(
                    "GraphQL API HTTP {status} (attempt {attempt}/{max_attempts}), retrying in {:.2}s",
                    delay.as_secs_f64()
                ),
                QueryOutcome::TransportError(message) => warn!(
                    "GraphQL request failed: {message} (attempt {attempt}/{max_attempts}), retrying in {:.2}s",
                    delay.as_secs_f64()
                ),
                _ => {}
            }
            self.stats.record_backoff(delay);
            tokio::time::sleep(delay).await;
        }
    }
}
