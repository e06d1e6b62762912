//! # Authgate (cookie-session API client)
//!
//! `authgate` talks to a REST backend that authenticates users through OAuth
//! providers or local email/password and keeps the session in an `HttpOnly`
//! cookie. The client never reads or builds that cookie; it only sends it back
//! and reacts to HTTP status codes.
//!
//! ## Transparent Session Refresh
//!
//! Every request goes through [`client::AuthClient`]. When a request fails with
//! `401 Unauthorized`, the client performs a single `POST /api/auth/refresh`,
//! retries the request once, and hands the retried outcome to the caller.
//!
//! - **Single-flight:** while a refresh is in flight, other requests that fail
//!   with 401 wait in a queue instead of starting their own refresh.
//! - **Loop breaking:** the refresh and status endpoints never trigger a
//!   refresh, and a request is retried at most once.
//! - **Session expiry:** when the refresh fails, queued callers are rejected and
//!   a `auth:session-expired` signal is broadcast through
//!   [`client::SessionAnnouncer`] unless the app is already on `/`.
//!
//! ## Auth Flows
//!
//! [`auth`] wraps the backend endpoints (status, login, signup, logout,
//! providers, protected data) and keeps an in-memory [`auth::SessionContext`]
//! that resets itself when the session expires.

pub mod auth;
pub mod cli;
pub mod client;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
