//! Client wrappers for the backend auth and protected endpoints. All calls go
//! through [`AuthClient`], so a 401 on a protected resource refreshes the
//! session transparently. Navigation after login, signup and logout happens
//! through the client's location.

use crate::{
    auth::types::{
        ActionRequest, ActionResult, AuthStatus, LoginRequest, OAuthProvider, ProtectedData,
        PublicData, SignupRequest,
    },
    client::{AuthClient, ClientError, STATUS_ENDPOINT},
    routes,
};
use tracing::{error, instrument, warn};
use url::Url;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const SIGNUP_ENDPOINT: &str = "/api/auth/signup";
pub const PROVIDERS_ENDPOINT: &str = "/api/auth/providers";
pub const LOGOUT_ENDPOINT: &str = "/logout";
pub const PROTECTED_DATA_ENDPOINT: &str = "/api/protected/data";
pub const PROTECTED_ACTION_ENDPOINT: &str = "/api/protected/action";
pub const PUBLIC_HEALTH_ENDPOINT: &str = "/api/public/health";

/// Mirrors backend session state. Any failure reads as unauthenticated.
#[instrument(skip(client))]
pub async fn check_auth_status(client: &AuthClient) -> AuthStatus {
    match client.get_json::<AuthStatus>(STATUS_ENDPOINT).await {
        Ok(status) => status,
        Err(err) => {
            error!("Auth status check failed: {}", err);
            AuthStatus::unauthenticated()
        }
    }
}

/// Fetches data that requires a valid session cookie.
///
/// # Errors
/// Returns an error if the request fails or the session cannot be refreshed.
#[instrument(skip(client))]
pub async fn fetch_protected_data(client: &AuthClient) -> Result<ProtectedData, ClientError> {
    client.get_json(PROTECTED_DATA_ENDPOINT).await
}

/// Runs a named action on the backend.
///
/// # Errors
/// Returns an error if the request fails or the session cannot be refreshed.
#[instrument(skip(client))]
pub async fn perform_action(client: &AuthClient, action: &str) -> Result<ActionResult, ClientError> {
    client
        .post_json(PROTECTED_ACTION_ENDPOINT, &ActionRequest::new(action))
        .await
}

/// Fetches the public health payload.
///
/// # Errors
/// Returns an error if the backend is unreachable or answers with an error.
#[instrument(skip(client))]
pub async fn fetch_public_data(client: &AuthClient) -> Result<PublicData, ClientError> {
    client.get_json(PUBLIC_HEALTH_ENDPOINT).await
}

/// Lists the enabled OAuth providers; empty when the call fails.
#[instrument(skip(client))]
pub async fn fetch_providers(client: &AuthClient) -> Vec<OAuthProvider> {
    match client.get_json(PROVIDERS_ENDPOINT).await {
        Ok(providers) => providers,
        Err(err) => {
            error!("Failed to fetch providers: {}", err);
            Vec::new()
        }
    }
}

/// Authenticates with email and password, then navigates to the dashboard.
/// The backend sets the session cookie on success. Never logs the password.
///
/// # Errors
/// Returns an error if the credentials are rejected or the request fails; no
/// navigation happens in that case.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login_with_email(client: &AuthClient, request: &LoginRequest) -> Result<(), ClientError> {
    client.post(LOGIN_ENDPOINT, request).await?;
    client.location().navigate(routes::DEFAULT_LOGIN_REDIRECT);
    Ok(())
}

/// Creates a local account, then navigates to the dashboard.
///
/// # Errors
/// Returns an error if the signup is rejected or the request fails.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn signup_with_email(
    client: &AuthClient,
    request: &SignupRequest,
) -> Result<(), ClientError> {
    client.post(SIGNUP_ENDPOINT, request).await?;
    client.location().navigate(routes::DEFAULT_LOGIN_REDIRECT);
    Ok(())
}

/// Ends the session and navigates home, even when the call fails.
///
/// # Errors
/// Returns the logout failure after navigating home.
#[instrument(skip(client))]
pub async fn logout(client: &AuthClient) -> Result<(), ClientError> {
    let result = client.post_empty(LOGOUT_ENDPOINT).await;
    client.location().navigate(routes::HOME);

    result.map(|_| ()).map_err(|err| {
        warn!("Logout failed: {}", err);
        err
    })
}

/// Builds `{base}/oauth2/authorization/{provider}`.
///
/// # Errors
/// Returns an error if the provider key yields an invalid URL.
pub fn oauth_authorization_url(base: &Url, provider_key: &str) -> Result<Url, ClientError> {
    let base = base.as_str().trim_end_matches('/');
    let provider_key = provider_key.trim().trim_matches('/');
    if provider_key.is_empty() {
        return Err(ClientError::Request(
            "OAuth provider key must not be empty".to_string(),
        ));
    }

    Ok(Url::parse(&format!(
        "{base}/oauth2/authorization/{provider_key}"
    ))?)
}

/// Redirects to the provider's authorization endpoint (full-page redirect).
///
/// # Errors
/// Returns an error if the redirect URL cannot be built.
pub fn login_with_provider(client: &AuthClient, provider_key: &str) -> Result<Url, ClientError> {
    let url = oauth_authorization_url(client.base_url(), provider_key)?;
    client.location().navigate(url.as_str());
    Ok(url)
}
