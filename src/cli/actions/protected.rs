//! Commands that need a session. They run as if the app sat on the dashboard,
//! so a failed refresh announces session expiry and is reported as such.

use crate::{
    auth,
    cli::{actions::print_json, globals::GlobalArgs},
    client::{ClientError, Location, SessionExpired, SharedLocation},
    routes,
};
use anyhow::{anyhow, Result};
use tokio::sync::broadcast::Receiver;
use tracing::warn;

#[derive(Debug)]
pub struct PerformArgs {
    pub globals: GlobalArgs,
    pub action: String,
}

/// # Errors
/// Returns an error if the request fails or the session has expired.
pub async fn data(globals: &GlobalArgs) -> Result<()> {
    let (client, location) = globals.client(routes::DEFAULT_LOGIN_REDIRECT)?;
    let mut expired = client.announcer().subscribe();

    match auth::fetch_protected_data(&client).await {
        Ok(data) => print_json(&data),
        Err(err) => Err(report(err, &mut expired, &location)),
    }
}

/// # Errors
/// Returns an error if the request fails or the session has expired.
pub async fn perform(args: &PerformArgs) -> Result<()> {
    let (client, location) = args.globals.client(routes::DEFAULT_LOGIN_REDIRECT)?;
    let mut expired = client.announcer().subscribe();

    match auth::perform_action(&client, &args.action).await {
        Ok(result) => print_json(&result),
        Err(err) => Err(report(err, &mut expired, &location)),
    }
}

/// Turns a failed protected call into the CLI error, leaving the protected
/// route when the session expired.
fn report(
    err: ClientError,
    expired: &mut Receiver<SessionExpired>,
    location: &SharedLocation,
) -> anyhow::Error {
    if expired.try_recv().is_ok() {
        if routes::is_protected(&location.pathname()) {
            location.navigate(routes::HOME);
        }
        warn!("session expired");
        return anyhow!(err).context("session expired, log in again");
    }

    anyhow!(err)
}
