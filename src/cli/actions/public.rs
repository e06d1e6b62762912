use crate::{
    auth,
    cli::{actions::print_json, globals::GlobalArgs},
    routes,
};
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct OAuthUrlArgs {
    pub globals: GlobalArgs,
    pub provider: String,
}

/// # Errors
/// Returns an error if the backend is unreachable or unhealthy.
pub async fn health(globals: &GlobalArgs) -> Result<()> {
    let (client, _) = globals.client(routes::HOME)?;
    let data = auth::fetch_public_data(&client)
        .await
        .context("health check failed")?;
    print_json(&data)
}

/// Lists providers; an unreachable backend yields an empty list.
/// # Errors
/// Returns an error if the client cannot be built.
pub async fn providers(globals: &GlobalArgs) -> Result<()> {
    let (client, _) = globals.client(routes::HOME)?;
    print_json(&auth::fetch_providers(&client).await)
}

/// # Errors
/// Returns an error if the URL cannot be built.
pub fn oauth_url(args: &OAuthUrlArgs) -> Result<()> {
    let base = args.globals.config()?.api_base_url;
    let url = auth::oauth_authorization_url(&base, &args.provider)?;
    println!("{url}");
    Ok(())
}
