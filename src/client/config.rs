//! Backend address and transport settings. The base address comes from
//! `AUTHGATE_API_URL` and falls back to a local default when the variable is
//! absent or empty. Configuration values are public; do not store secrets here.

use super::error::ClientError;
use std::time::Duration;
use url::Url;

/// Environment variable selecting the backend base address.
pub const API_URL_ENV: &str = "AUTHGATE_API_URL";
/// Base address used when `AUTHGATE_API_URL` is unset or empty.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    /// Loads the base address from `AUTHGATE_API_URL`.
    ///
    /// # Errors
    /// Returns an error if the configured address is not a valid URL.
    pub fn from_env() -> Result<Self, ClientError> {
        let value = std::env::var(API_URL_ENV).ok();
        Self::with_base_url(value.as_deref())
    }

    /// Builds a config from an optional base address, applying the fallback.
    ///
    /// # Errors
    /// Returns an error if the address is not a valid URL.
    pub fn with_base_url(value: Option<&str>) -> Result<Self, ClientError> {
        let api_base_url = Url::parse(resolve_base_url(value))?;

        Ok(Self {
            api_base_url,
            timeout: None,
            user_agent: crate::APP_USER_AGENT.to_string(),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Returns the trimmed value, or the default address when it is missing or blank.
#[must_use]
pub fn resolve_base_url(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_API_URL,
    }
}
