//! Show a table of the number of commits per repository per day made to
//! GitHub repositories over the past several days.
//!
//! Requires a GitHub access token, taken from the `GH_TOKEN` or
//! `GITHUB_TOKEN` environment variable, from `gh auth token`, or from the
//! `hub.oauthtoken` Git config option.
//!
//! # Examples
//!
//! ```sh
//! # The past week
//! ghcontribs
//!
//! # The past month with alternating rows colored
//! ghcontribs --days 30 --highlight
//!
//! # Log every request and retry to stderr
//! ghcontribs -v
//! ```

use std::process;

use chrono::Local;
use clap::Parser;
use ghcontribs::config::DEFAULT_DAYS;
use ghcontribs::{ReportConfig, resolve_token, run_report};
use tracing_subscriber::EnvFilter;

/// Show a table of the number of commits per repository per day made to
/// GitHub repositories over the past several days.
#[derive(Parser)]
#[command(name = "ghcontribs", version)]
struct Cli {
    /// How many days back to show
    #[arg(short, long, default_value_t = DEFAULT_DAYS,
          value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Color alternating rows of the table
    #[arg(short = 'H', long)]
    highlight: bool,

    /// Log requests and retries to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ghcontribs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn report(cli: &Cli) -> Result<String, ghcontribs::Error> {
    let token = resolve_token()?;
    let config = ReportConfig::default()
        .with_days(cli.days)
        .with_highlight(cli.highlight);
    let today = Local::now().date_naive();
    run_report(&config, &token, today, Local).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match report(&cli).await {
        Ok(table) => println!("{table}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_and_short_flags() {
        let cli = Cli::parse_from(["ghcontribs"]);
        assert_eq!(cli.days, 7);
        assert!(!cli.highlight);

        let cli = Cli::parse_from(["ghcontribs", "-d", "30", "-H"]);
        assert_eq!(cli.days, 30);
        assert!(cli.highlight);
    }

    #[test]
    fn zero_days_rejected() {
        assert!(Cli::try_parse_from(["ghcontribs", "--days", "0"]).is_err());
    }
}
