//! Per-day commit contributions with adaptive result sizing.
//!
//! The contributions query returns at most `maxRepositories` rows but also
//! reports the true number of repositories contributed to. The fetcher asks
//! for [`INITIAL_GUESS`] rows first and repeats the query with the exact count
//! only when the guess came up short.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, info};

use super::dates::DayWindow;
use crate::api::error::ApiError;
use crate::api::executor::QueryExecutor;
use crate::{QueryRequest, Transport};

/// Rows requested on the first call for each day.
pub const INITIAL_GUESS: u64 = 10;

/// Repository (`owner/name`) to commit count for one day.
pub type ContributionSnapshot = BTreeMap<String, u64>;

pub const CONTRIBUTIONS_QUERY: &str = r#"
query ($from: DateTime!, $to: DateTime!, $maxRepositories: Int!) {
    viewer {
        contributionsCollection (from: $from, to: $to) {
            totalRepositoriesWithContributedCommits
            commitContributionsByRepository (maxRepositories: $maxRepositories) {
                repository {
                    nameWithOwner
                }
                contributions {
                    totalCount
                }
            }
        }
    }
}
"#;

// ── Response shape ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Viewer {
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    total_repositories_with_contributed_commits: u64,
    #[serde(default)]
    commit_contributions_by_repository: Vec<RepositoryContributions>,
}

#[derive(Deserialize, Debug)]
struct RepositoryContributions {
    repository: Repository,
    contributions: Contributions,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Repository {
    name_with_owner: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Contributions {
    total_count: u64,
}

// ── Fetcher ────────────────────────────────────────────────────────

/// Fetches one [`ContributionSnapshot`] per day window.
pub struct ContributionFetcher<T: Transport> {
    executor: QueryExecutor<T>,
    initial_guess: u64,
}

impl<T: Transport> ContributionFetcher<T> {
    pub fn new(executor: QueryExecutor<T>) -> Self {
        Self::with_initial_guess(executor, INITIAL_GUESS)
    }

    pub fn with_initial_guess(executor: QueryExecutor<T>, initial_guess: u64) -> Self {
        Self {
            executor,
            initial_guess,
        }
    }

    pub fn executor(&self) -> &QueryExecutor<T> {
        &self.executor
    }

    pub fn initial_guess(&self) -> u64 {
        self.initial_guess
    }

    /// Fetch the contributions made inside `window`.
    ///
    /// Makes one call, or two when more repositories were contributed to than
    /// the initial guess covers.
    pub async fn fetch_day(&mut self, window: &DayWindow) -> Result<ContributionSnapshot, ApiError> {
        let mut collection = self.query(window, self.initial_guess).await?;
        let true_count = collection.total_repositories_with_contributed_commits;

        if true_count == 0 {
            info!("{}: no contributions", window.date);
            return Ok(ContributionSnapshot::new());
        }

        if true_count > self.initial_guess {
            debug!(
                "{}: {true_count} repositories exceed guess of {}, re-querying",
                window.date, self.initial_guess
            );
            collection = self.query(window, true_count).await?;
        }

        let snapshot: ContributionSnapshot = collection
            .commit_contributions_by_repository
            .into_iter()
            .map(|row| (row.repository.name_with_owner, row.contributions.total_count))
            .collect();
        info!(
            "{}: {} commit(s) across {} repositories",
            window.date,
            snapshot.values().sum::<u64>(),
            snapshot.len()
        );
        Ok(snapshot)
    }

    async fn query(
        &mut self,
        window: &DayWindow,
        max_repositories: u64,
    ) -> Result<ContributionsCollection, ApiError> {
        let request = contributions_request(window, max_repositories);
        let data = self.executor.execute(&request).await?;
        let parsed: ViewerData = serde_json::from_value(serde_json::Value::Object(data))
            .map_err(|e| ApiError::Malformed(format!("unexpected contributions shape: {e}")))?;
        Ok(parsed.viewer.contributions_collection)
    }
}

/// Build the contributions query for `window` asking for up to
/// `max_repositories` rows.
pub fn contributions_request(window: &DayWindow, max_repositories: u64) -> QueryRequest {
    QueryRequest::new(CONTRIBUTIONS_QUERY)
        .var("from", window.start.to_rfc3339())
        .var("to", window.end.to_rfc3339())
        .var("maxRepositories", max_repositories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;
    use crate::{RawResponse, TransportError};
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::{Value, json};

    fn window() -> DayWindow {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        DayWindow::for_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), &tz)
    }

    fn response(total: u64, rows: &[(&str, u64)]) -> Result<RawResponse, TransportError> {
        let rows: Vec<Value> = rows
            .iter()
            .map(|(name, count)| {
                json!({
                    "repository": {"nameWithOwner": name},
                    "contributions": {"totalCount": count},
                })
            })
            .collect();
        let body = json!({
            "data": {
                "viewer": {
                    "contributionsCollection": {
                        "totalRepositoriesWithContributedCommits": total,
                        "commitContributionsByRepository": rows,
                    }
                }
            }
        });
        Ok(RawResponse::new(200, body.to_string()))
    }

    fn fetcher(script: Vec<Result<RawResponse, TransportError>>) -> ContributionFetcher<ScriptedTransport> {
        ContributionFetcher::new(QueryExecutor::new(ScriptedTransport::new(script)))
    }

    fn as_refs(rows: &[(String, u64)]) -> Vec<(&str, u64)> {
        rows.iter().map(|(n, c)| (n.as_str(), *c)).collect()
    }

    fn max_repositories(req: &QueryRequest) -> &Value {
        &req.variables["maxRepositories"]
    }

    #[tokio::test]
    async fn guess_sufficient_makes_one_call() {
        let mut fetcher = fetcher(vec![response(3, &[("a/x", 1), ("a/y", 2), ("b/z", 7)])]);

        let snapshot = fetcher.fetch_day(&window()).await.unwrap();

        let transport = fetcher.executor().transport();
        assert_eq!(transport.calls(), 1);
        assert_eq!(max_repositories(&transport.requests()[0]), &json!(10));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["b/z"], 7);
    }

    #[tokio::test]
    async fn guess_short_requeries_with_true_count() {
        let truncated: Vec<(String, u64)> = (0..10).map(|i| (format!("org/r{i:02}"), 1)).collect();
        let full: Vec<(String, u64)> = (0..25).map(|i| (format!("org/r{i:02}"), 2)).collect();
        let mut fetcher = fetcher(vec![
            response(25, &as_refs(&truncated)),
            response(25, &as_refs(&full)),
        ]);

        let snapshot = fetcher.fetch_day(&window()).await.unwrap();

        let requests = fetcher.executor().transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(max_repositories(&requests[0]), &json!(10));
        assert_eq!(max_repositories(&requests[1]), &json!(25));
        assert_eq!(requests[0].variables["from"], requests[1].variables["from"]);
        assert_eq!(snapshot.len(), 25);
        assert!(snapshot.values().all(|&c| c == 2), "second response is authoritative");
    }

    #[tokio::test]
    async fn guess_exactly_right_makes_one_call() {
        let rows: Vec<(String, u64)> = (0..10).map(|i| (format!("org/r{i}"), 1)).collect();
        let mut fetcher = fetcher(vec![response(10, &as_refs(&rows))]);

        let snapshot = fetcher.fetch_day(&window()).await.unwrap();

        assert_eq!(fetcher.executor().transport().calls(), 1);
        assert_eq!(snapshot.len(), 10);
    }

    #[tokio::test]
    async fn zero_contributions_is_empty_snapshot() {
        let mut fetcher = fetcher(vec![response(0, &[])]);

        let snapshot = fetcher.fetch_day(&window()).await.unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(fetcher.executor().transport().calls(), 1);
    }

    #[tokio::test]
    async fn window_bounds_sent_as_rfc3339() {
        let mut fetcher = fetcher(vec![response(0, &[])]);
        fetcher.fetch_day(&window()).await.unwrap();

        let req = &fetcher.executor().transport().requests()[0];
        assert_eq!(req.query, CONTRIBUTIONS_QUERY);
        assert_eq!(req.variables["from"], "2024-03-01T00:00:00-05:00");
        assert_eq!(req.variables["to"], "2024-03-01T23:59:59-05:00");
    }

    #[tokio::test]
    async fn unexpected_shape_is_malformed() {
        let body = json!({"data": {"viewer": null}}).to_string();
        let mut fetcher = fetcher(vec![Ok(RawResponse::new(200, body))]);

        let err = fetcher.fetch_day(&window()).await.unwrap_err();

        assert!(matches!(err, ApiError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn error_on_second_call_propagates() {
        let rows: Vec<(String, u64)> = (0..10).map(|i| (format!("org/r{i}"), 1)).collect();
        let mut fetcher = fetcher(vec![
            response(12, &as_refs(&rows)),
            Ok(RawResponse::new(403, "forbidden")),
        ]);

        let err = fetcher.fetch_day(&window()).await.unwrap_err();

        assert!(matches!(err, ApiError::ClientError { status: 403, .. }));
        assert_eq!(fetcher.executor().transport().calls(), 2);
    }
}
