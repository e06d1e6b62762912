//! Maps validated CLI matches to the action to run.

use crate::cli::{
    actions::{protected::PerformArgs, public::OAuthUrlArgs, session, Action},
    commands::{self, backend},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = backend::parse(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_STATUS, _)) => Ok(Action::Status(globals)),
        Some((commands::CMD_HEALTH, _)) => Ok(Action::Health(globals)),
        Some((commands::CMD_PROVIDERS, _)) => Ok(Action::Providers(globals)),
        Some((commands::CMD_LOGOUT, _)) => Ok(Action::Logout(globals)),
        Some((commands::CMD_DATA, _)) => Ok(Action::Data(globals)),
        Some((commands::CMD_LOGIN, sub_m)) => Ok(Action::Login(session::LoginArgs {
            globals,
            email: required(sub_m, commands::ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
        })),
        Some((commands::CMD_SIGNUP, sub_m)) => Ok(Action::Signup(session::SignupArgs {
            globals,
            email: required(sub_m, commands::ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
            name: required(sub_m, commands::ARG_NAME)?,
        })),
        Some((commands::CMD_ACTION, sub_m)) => Ok(Action::Perform(PerformArgs {
            globals,
            action: required(sub_m, commands::ARG_ACTION_NAME)?,
        })),
        Some((commands::CMD_OAUTH_URL, sub_m)) => Ok(Action::OAuthUrl(OAuthUrlArgs {
            globals,
            provider: required(sub_m, commands::ARG_PROVIDER)?,
        })),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
