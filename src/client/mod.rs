//! Authenticated HTTP client. Requests go out through the [`Transport`]; failed
//! responses are handed to the [`RefreshCoordinator`], which may refresh the
//! session once and retry before the caller sees a result.

pub mod announcer;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod request;
pub mod transport;

pub use announcer::{SessionAnnouncer, SessionExpired, SESSION_EXPIRED_EVENT};
pub use config::ClientConfig;
pub use coordinator::RefreshCoordinator;
pub use error::ClientError;
pub use location::{Location, SharedLocation};
pub use request::{ApiRequest, ApiResponse, PendingRequest};
pub use transport::Transport;

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

/// Re-issues the session cookie; any non-2xx answer is a refresh failure.
pub const REFRESH_ENDPOINT: &str = "/api/auth/refresh";
/// Session introspection; never triggers a refresh.
pub const STATUS_ENDPOINT: &str = "/api/auth/status";

/// Cheap to clone; clones share the transport, cookie store and refresh state.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Transport,
    coordinator: RefreshCoordinator,
    announcer: SessionAnnouncer,
    location: Arc<dyn Location>,
}

impl AuthClient {
    /// Builds a client. The announcer and location are injected so callers can
    /// subscribe to session expiry and control redirect suppression.
    ///
    /// # Errors
    /// Returns an error if the HTTP transport cannot be initialized.
    pub fn new(
        config: &ClientConfig,
        announcer: SessionAnnouncer,
        location: Arc<dyn Location>,
    ) -> Result<Self, ClientError> {
        let transport = Transport::new(config)?;
        let coordinator = RefreshCoordinator::new(announcer.clone(), Arc::clone(&location));

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                coordinator,
                announcer,
                location,
            }),
        })
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.transport.base_url()
    }

    #[must_use]
    pub fn announcer(&self) -> &SessionAnnouncer {
        &self.inner.announcer
    }

    #[must_use]
    pub fn location(&self) -> &dyn Location {
        self.inner.location.as_ref()
    }

    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.inner.coordinator.is_refreshing()
    }

    /// Sends a request, refreshing the session and retrying once on 401.
    ///
    /// # Errors
    /// Returns the transport error, the original 401 when the session cannot be
    /// refreshed, or [`ClientError::RefreshFailed`] when the request was queued
    /// behind a refresh that failed.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let pending = PendingRequest::new(request);

        match self.inner.transport.execute(&pending.request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                self.inner
                    .coordinator
                    .recover(&self.inner.transport, pending, err)
                    .await
            }
        }
    }

    /// # Errors
    /// See [`AuthClient::send`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::get(path)).await
    }

    /// # Errors
    /// See [`AuthClient::send`]; also fails if the body cannot be encoded.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// # Errors
    /// See [`AuthClient::send`].
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::post(path)).await
    }

    /// # Errors
    /// See [`AuthClient::send`]; also fails if the body does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.get(path).await?.json()
    }

    /// # Errors
    /// See [`AuthClient::post`]; also fails if the body does not decode as `T`.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.post(path, body).await?.json()
    }
}
