//! In-memory mirror of the backend session. It is hydrated from
//! `/api/auth/status` and resets itself whenever the session-expired signal
//! fires. Only non-sensitive metadata is kept; cookies stay opaque.

use crate::{
    auth::{client::check_auth_status, types::AuthStatus, types::User},
    client::{AuthClient, Location, SessionAnnouncer},
    routes,
};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub authenticated: bool,
    pub loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            authenticated: false,
            loading: true,
        }
    }
}

/// Auth session state shared by clones.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    state: Arc<RwLock<SessionSnapshot>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().authenticated
    }

    /// Stores the backend's view of the session and ends the loading phase.
    pub fn apply(&self, status: AuthStatus) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.authenticated = status.authenticated;
        state.user = status.user;
        state.loading = false;
    }

    /// Drops user data, typically after logout or session expiry.
    pub fn clear(&self) {
        self.apply(AuthStatus::unauthenticated());
    }

    /// Pulls the latest status from the backend.
    pub async fn refresh(&self, client: &AuthClient) {
        let status = check_auth_status(client).await;
        debug!(authenticated = status.authenticated, "session state synced");
        self.apply(status);
    }

    /// Resets the session and navigates home on every session-expired signal.
    /// The task ends when the announcer goes away.
    #[must_use]
    pub fn watch_expiry(
        &self,
        announcer: &SessionAnnouncer,
        location: Arc<dyn Location>,
    ) -> JoinHandle<()> {
        let mut rx = announcer.subscribe();
        let session = self.clone();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        info!(event = event.as_str(), "session expired, clearing state");
                        session.clear();
                        if !routes::is_public(&location.pathname()) {
                            location.navigate(routes::HOME);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "missed session-expired signals, clearing state");
                        session.clear();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
