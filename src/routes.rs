//! Application route table shared by navigation and redirect suppression.

/// Public landing page; session-expiry redirects are suppressed here.
pub const HOME: &str = "/";
pub const ERROR: &str = "/error";
/// Destination after a successful local login or signup.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/dashboard";

/// Routes that stay accessible without a session.
pub const PUBLIC_ROUTES: &[&str] = &[HOME, ERROR];

/// Routes that need a session cookie.
pub const PROTECTED_ROUTES: &[&str] = &[DEFAULT_LOGIN_REDIRECT];

#[must_use]
pub fn is_public(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&path)
}

#[must_use]
pub fn is_protected(path: &str) -> bool {
    PROTECTED_ROUTES.iter().any(|route| path.starts_with(route))
}
