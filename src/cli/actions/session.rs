use crate::{
    auth::{self, AuthStatus, LoginRequest, SessionContext, SignupRequest},
    cli::{actions::print_json, globals::GlobalArgs},
    client::Location,
    routes,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde_json::json;
use tracing::info;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug)]
pub struct SignupArgs {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
    pub name: String,
}

/// Prints the backend's view of the session.
/// # Errors
/// Returns an error if the client cannot be built.
pub async fn status(globals: &GlobalArgs) -> Result<()> {
    let (client, _) = globals.client(routes::HOME)?;
    let session = SessionContext::new();
    session.refresh(&client).await;

    let snapshot = session.snapshot();
    print_json(&AuthStatus {
        authenticated: snapshot.authenticated,
        user: snapshot.user,
    })
}

/// Logs in and prints the session cookie so later calls can reuse it.
/// # Errors
/// Returns an error if the credentials are rejected or the backend is unreachable.
pub async fn login(args: LoginArgs) -> Result<()> {
    let (client, location) = args.globals.client(routes::HOME)?;
    let request = LoginRequest::new(args.email, args.password);

    auth::login_with_email(&client, &request)
        .await
        .context("login failed")?;
    info!(location = %location.pathname(), "logged in");

    print_json(&json!({
        "location": location.pathname(),
        "cookie": client.transport().cookie_header(),
    }))
}

/// # Errors
/// Returns an error if the signup is rejected or the backend is unreachable.
pub async fn signup(args: SignupArgs) -> Result<()> {
    let (client, location) = args.globals.client(routes::HOME)?;
    let request = SignupRequest::new(args.email, args.password, args.name);

    auth::signup_with_email(&client, &request)
        .await
        .context("signup failed")?;

    print_json(&json!({
        "location": location.pathname(),
        "cookie": client.transport().cookie_header(),
    }))
}

/// # Errors
/// Returns an error if the backend rejects the logout.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let (client, location) = globals.client(routes::DEFAULT_LOGIN_REDIRECT)?;
    auth::logout(&client).await.context("logout failed")?;

    print_json(&json!({ "location": location.pathname() }))
}
