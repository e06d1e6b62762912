use crate::client::{AuthClient, ClientConfig, SessionAnnouncer, SharedLocation};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};

/// Backend connection settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub cookie: Option<SecretString>,
    pub timeout: Option<Duration>,
}

impl GlobalArgs {
    /// Resolves the client configuration, falling back to the default address.
    ///
    /// # Errors
    /// Returns an error if the base address is not a valid URL.
    pub fn config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::with_base_url(self.api_url.as_deref())
            .context("invalid backend base URL")?;

        Ok(match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        })
    }

    /// Builds a client that starts out on `path` and carries the seeded cookies.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the client cannot be built.
    pub fn client(&self, path: &str) -> Result<(AuthClient, SharedLocation)> {
        let location = SharedLocation::new(path);
        let client = AuthClient::new(
            &self.config()?,
            SessionAnnouncer::new(),
            Arc::new(location.clone()),
        )
        .context("failed to build HTTP client")?;

        if let Some(cookie) = &self.cookie {
            client.transport().seed_cookies(cookie.expose_secret());
        }

        Ok((client, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Location;

    #[test]
    fn test_global_args_defaults() {
        let args = GlobalArgs::default();
        let config = args.config().unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_global_args_client() {
        let args = GlobalArgs {
            api_url: Some("https://api.example.com".to_string()),
            cookie: Some(SecretString::from("jwt=abc; refresh=def".to_string())),
            timeout: Some(Duration::from_secs(5)),
        };
        assert_eq!(args.config().unwrap().timeout, Some(Duration::from_secs(5)));

        let (client, location) = args.client("/dashboard").unwrap();
        assert_eq!(location.pathname(), "/dashboard");
        let cookies = client.transport().cookie_header().unwrap();
        assert!(cookies.contains("jwt=abc"));
        assert!(cookies.contains("refresh=def"));
        assert!(!format!("{args:?}").contains("jwt=abc"));
    }

    #[test]
    fn test_global_args_invalid_url() {
        let args = GlobalArgs {
            api_url: Some("not a url".to_string()),
            ..GlobalArgs::default()
        };
        assert!(args.config().is_err());
    }
}
