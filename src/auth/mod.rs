//! Backend auth flows and the in-memory session mirror.

pub mod client;
pub mod session;
pub mod types;

pub use client::{
    check_auth_status, fetch_protected_data, fetch_providers, fetch_public_data,
    login_with_email, login_with_provider, logout, oauth_authorization_url, perform_action,
    signup_with_email,
};
pub use session::{SessionContext, SessionSnapshot};
pub use types::{
    ActionRequest, ActionResult, AuthStatus, LoginRequest, OAuthProvider, ProtectedData,
    ProtectedPayload, PublicData, SignupRequest, User,
};
