use crate::cli::actions::{protected, public, session, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Status(globals) => session::status(&globals).await,
        Action::Health(globals) => public::health(&globals).await,
        Action::Providers(globals) => public::providers(&globals).await,
        Action::Login(args) => session::login(args).await,
        Action::Signup(args) => session::signup(args).await,
        Action::Logout(globals) => session::logout(&globals).await,
        Action::Data(globals) => protected::data(&globals).await,
        Action::Perform(args) => protected::perform(&args).await,
        Action::OAuthUrl(args) => public::oauth_url(&args),
    }
}
