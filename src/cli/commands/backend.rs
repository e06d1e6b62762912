use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_COOKIE: &str = "cookie";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Backend base URL (default: http://localhost:8080)")
                .env(crate::client::config::API_URL_ENV)
                .global(true),
        )
        .arg(
            Arg::new(ARG_COOKIE)
                .long("cookie")
                .help("Session cookies to send, as 'name=value; name2=value2'")
                .env("AUTHGATE_SESSION_COOKIE")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds (default: none)")
                .env("AUTHGATE_TIMEOUT_SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

/// Reads the backend connection arguments.
///
/// # Errors
/// Returns an error if the arguments cannot be read.
pub fn parse(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .try_get_one::<String>(ARG_API_URL)
        .context("invalid --api-url")?
        .cloned();
    let cookie = matches
        .try_get_one::<String>(ARG_COOKIE)
        .context("invalid --cookie")?
        .map(|cookie| SecretString::from(cookie.clone()));
    let timeout = matches
        .try_get_one::<u64>(ARG_TIMEOUT)
        .context("invalid --timeout")?
        .map(|seconds| Duration::from_secs(*seconds));

    Ok(GlobalArgs {
        api_url,
        cookie,
        timeout,
    })
}
