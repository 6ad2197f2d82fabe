//! Terminal failures of the GraphQL query executor.

use serde_json::Value;
use thiserror::Error;

/// A request that could not produce a usable `data` payload.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A 4xx (or other non-5xx, non-success) response. Never retried.
    #[error("HTTP client error {status} from GraphQL API:\n{}", pretty_body(.body))]
    ClientError { status: u16, body: String },

    /// A 5xx response: either outside the retryable set, or retryable and
    /// still failing once the attempt budget ran out.
    #[error(
        "HTTP server error {status} from GraphQL API after {attempts} attempt(s):\n{}",
        pretty_body(.body)
    )]
    ServerError {
        status: u16,
        body: String,
        attempts: u32,
    },

    /// A successful HTTP response whose body carries GraphQL `errors`.
    #[error("{}", format_graphql_errors(.0))]
    GraphQl(Vec<Value>),

    /// The request never produced an HTTP response.
    #[error("request to GraphQL API failed after {attempts} attempt(s): {message}")]
    Transport { message: String, attempts: u32 },

    /// A successful HTTP response whose body is not the expected shape.
    #[error("malformed GraphQL API response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// HTTP status carried by this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ClientError { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Pretty-print a response body as JSON, or return it verbatim when it does
/// not parse.
pub fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

/// Render a GraphQL `errors` array as `Key: value` blocks separated by `---`.
///
/// Fields keep the order the server sent them in; nested values are printed
/// as JSON with sorted keys.
pub fn format_graphql_errors(errors: &[Value]) -> String {
    if !errors.iter().all(Value::is_object) {
        let sorted: Vec<Value> = errors.iter().map(sort_keys).collect();
        let dump = serde_json::to_string_pretty(&sorted).unwrap_or_default();
        return format!("MALFORMED GRAPHQL ERROR:\n{dump}");
    }

    let mut lines = vec![if errors.len() == 1 {
        "GraphQL API error:".to_string()
    } else {
        "GraphQL API errors:".to_string()
    }];
    for (i, error) in errors.iter().filter_map(Value::as_object).enumerate() {
        if i > 0 {
            lines.push("---".to_string());
        }
        for (key, value) in error {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => sort_keys(other).to_string(),
            };
            lines.push(format!("{}: {rendered}", title_case(key)));
        }
    }
    lines.join("\n")
}

/// Copy of `value` with every object's keys in sorted order.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
