//! Contribution reporting: day windows, adaptive fetching, tabulation.
//!
//! - [`dates`]: [`DateRange`] yields one [`DayWindow`](dates::DayWindow) per
//!   calendar day in a caller-supplied timezone.
//! - [`fetch`]: [`ContributionFetcher`] turns a window into a
//!   [`ContributionSnapshot`](fetch::ContributionSnapshot) with one or two
//!   GraphQL calls.
//! - [`tabulate`]: [`ContribTabulator`] merges snapshots into a dense matrix
//!   and renders it.
//!
//! [`collect`] drives the three strictly in sequence; [`run_report`] wires
//! them to a real HTTP session.

pub mod dates;
pub mod fetch;
pub mod tabulate;

use chrono::{NaiveDate, TimeZone};
use tracing::{debug, info};

pub use dates::DateRange;
pub use fetch::ContributionFetcher;
pub use tabulate::ContribTabulator;

use crate::api::error::ApiError;
use crate::api::executor::QueryExecutor;
use crate::config::ReportConfig;
use crate::table::highlight_alternate_rows;
use crate::{Error, HttpTransport, Transport};

/// Fetch every day of `range` in order and tabulate the results.
///
/// The first failure aborts the whole run; no partial table is returned.
pub async fn collect<T, Tz>(
    fetcher: &mut ContributionFetcher<T>,
    range: &DateRange<Tz>,
) -> Result<ContribTabulator, ApiError>
where
    T: Transport,
    Tz: TimeZone,
{
    let mut tbl = ContribTabulator::new();
    for window in range {
        let snapshot = fetcher.fetch_day(&window).await?;
        tbl.add(window.date, snapshot);
    }
    Ok(tbl)
}

/// Build the contributions table for the `config.days` days ending `today`
/// in `tz`, rendered and optionally highlighted.
pub async fn run_report<Tz: TimeZone>(
    config: &ReportConfig,
    token: &str,
    today: NaiveDate,
    tz: Tz,
) -> Result<String, Error> {
    let transport = HttpTransport::with_endpoint(
        token,
        &config.endpoint,
        &config.user_agent,
        config.timeout,
    )
    .map_err(Error::Client)?;
    let executor = QueryExecutor::with_retry(transport, config.retry.clone());
    let mut fetcher = ContributionFetcher::with_initial_guess(executor, config.initial_guess);
    let range = DateRange::last_n_days(today, config.days, tz);

    info!(
        "Collecting contributions from {} to {}",
        range.start(),
        range.end()
    );
    let tbl = collect(&mut fetcher, &range).await?;
    debug!("{}", fetcher.executor().stats().summary());

    let rendered = tbl.render();
    Ok(if config.highlight {
        highlight_alternate_rows(&rendered)
    } else {
        rendered
    })
}
