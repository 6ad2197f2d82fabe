//! GitHub token discovery.
//!
//! Looks in, in order: the `GH_TOKEN` and `GITHUB_TOKEN` environment
//! variables, `gh auth token`, and the `hub.oauthtoken` Git config option.

use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Environment variables checked for a token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// A report cannot start because required configuration is missing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "GitHub token not found. Set via GH_TOKEN, GITHUB_TOKEN, `gh auth login`, \
         or the hub.oauthtoken Git config option."
    )]
    TokenNotFound,
}

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Env(&'static str),
    GhCli,
    HubConfig,
}

/// Resolve a token from the process environment and local tooling.
pub fn resolve_token() -> Result<String, ConfigError> {
    resolve_token_with(|name| std::env::var(name).ok(), run_command)
        .map(|(token, _)| token)
}

/// Resolve a token with injectable environment and command lookups.
///
/// `env` returns the value of an environment variable; `command` runs a
/// program with arguments and returns its stdout on success.
pub fn resolve_token_with<E, C>(env: E, command: C) -> Result<(String, TokenSource), ConfigError>
where
    E: Fn(&str) -> Option<String>,
    C: Fn(&str, &[&str]) -> Option<String>,
{
    for name in TOKEN_ENV_VARS {
        if let Some(token) = env(name).and_then(non_blank) {
            debug!("Using GitHub token from ${name}");
            return Ok((token, TokenSource::Env(name)));
        }
    }
    if let Some(token) = command("gh", &["auth", "token"]).and_then(non_blank) {
        debug!("Using GitHub token from `gh auth token`");
        return Ok((token, TokenSource::GhCli));
    }
    if let Some(token) = command("git", &["config", "--get", "hub.oauthtoken"]).and_then(non_blank)
    {
        debug!("Using GitHub token from hub.oauthtoken");
        return Ok((token, TokenSource::HubConfig));
    }
    Err(ConfigError::TokenNotFound)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
