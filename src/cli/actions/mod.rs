pub mod protected;
pub mod public;
pub mod session;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Status(GlobalArgs),
    Health(GlobalArgs),
    Providers(GlobalArgs),
    Login(session::LoginArgs),
    Signup(session::SignupArgs),
    Logout(GlobalArgs),
    Data(GlobalArgs),
    Perform(protected::PerformArgs),
    OAuthUrl(public::OAuthUrlArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Prints `value` as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
