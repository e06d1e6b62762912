use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built, nothing was sent.
    #[error("invalid request: {0}")]
    Request(String),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// Transport failure without an HTTP response (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Http {
        status: StatusCode,
        url: String,
        body: Option<Value>,
    },
    /// Handed to every caller queued behind a refresh that did not succeed.
    #[error("token refresh failed")]
    RefreshFailed,
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Status code of a structured failure, `None` when no response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn is_refresh_failure(&self) -> bool {
        matches!(self, ClientError::RefreshFailed)
    }

    /// Response payload of a structured failure.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            ClientError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
