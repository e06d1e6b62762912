//! Single-flight session refresh for failed requests.
//!
//! Flow Overview:
//! 1. Failures without a response (network, request construction) pass through
//!    unchanged and are not logged.
//! 2. Non-401 statuses pass through and are logged with status, payload and URL.
//! 3. A 401 from the refresh or status endpoint is rejected immediately.
//! 4. A 401 from a request that was already retried is rejected with its error.
//! 5. A 401 while a refresh is in flight queues the caller until it settles.
//! 6. Otherwise the caller becomes the leader: it marks its request retried,
//!    issues the one refresh call, drains the queue with the outcome, and either
//!    retries its request or announces session expiry and returns its original
//!    error.
//!
//! `refreshing` and the waiter queue live behind one mutex that is never held
//! across an await, so at most one refresh is in flight even on a multi-threaded
//! runtime, and the queue is empty whenever `refreshing` is false.

use super::{
    announcer::SessionAnnouncer,
    error::ClientError,
    location::Location,
    request::{ApiRequest, ApiResponse, PendingRequest},
    transport::Transport,
    REFRESH_ENDPOINT, STATUS_ENDPOINT,
};
use crate::routes;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

/// Marker outcome handed to waiters when the refresh did not succeed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RefreshFailed;

pub type RefreshOutcome = Result<(), RefreshFailed>;

/// The `refreshing` flag and the waiters parked behind the in-flight refresh.
#[derive(Debug, Default)]
pub struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

impl RefreshState {
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    #[must_use]
    pub fn should_queue(&self) -> bool {
        self.refreshing
    }

    #[must_use]
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    /// Parks a caller behind the in-flight refresh, in arrival order.
    pub fn enqueue(&mut self) -> oneshot::Receiver<RefreshOutcome> {
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        rx
    }

    pub fn begin(&mut self) {
        self.refreshing = true;
    }

    /// Ends the refresh cycle and settles every waiter with `outcome`.
    /// Returns the number of waiters released.
    pub fn drain(&mut self, outcome: RefreshOutcome) -> usize {
        self.refreshing = false;
        let waiters = std::mem::take(&mut self.waiters);
        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away is simply skipped.
            let _ = waiter.send(outcome);
        }
        released
    }
}

enum Ticket {
    Leader,
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    announcer: SessionAnnouncer,
    location: Arc<dyn Location>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new(announcer: SessionAnnouncer, location: Arc<dyn Location>) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            announcer,
            location,
        }
    }

    fn state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state().is_refreshing()
    }

    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state().waiting()
    }

    /// Either joins the queue or claims the refresh, atomically.
    fn ticket(&self) -> Ticket {
        let mut state = self.state();
        if state.should_queue() {
            Ticket::Waiter(state.enqueue())
        } else {
            state.begin();
            Ticket::Leader
        }
    }

    /// Decides what happens to a request that failed with `err`.
    ///
    /// # Errors
    /// Returns `err` unchanged when no refresh applies or the refresh fails for
    /// the leader, [`ClientError::RefreshFailed`] for queued callers of a failed
    /// refresh, or the error of the retried request.
    #[instrument(skip_all, fields(path = %pending.request.path, request_id = %pending.request.id))]
    pub async fn recover(
        &self,
        transport: &Transport,
        mut pending: PendingRequest,
        err: ClientError,
    ) -> Result<ApiResponse, ClientError> {
        let Some(status) = err.status() else {
            return Err(err);
        };

        if status != StatusCode::UNAUTHORIZED {
            return Err(log_api_error(err));
        }

        if is_refresh_exempt(&pending.request) {
            debug!("401 from an auth endpoint, not refreshing");
            return Err(err);
        }

        if pending.retried {
            return Err(log_api_error(err));
        }

        match self.ticket() {
            Ticket::Waiter(rx) => {
                debug!("refresh in flight, queueing request");
                match rx.await {
                    Ok(Ok(())) => {
                        pending.mark_retried();
                        retry(transport, &pending).await
                    }
                    Ok(Err(RefreshFailed)) | Err(_) => Err(ClientError::RefreshFailed),
                }
            }
            Ticket::Leader => {
                pending.mark_retried();
                let cycle = RefreshCycle::new(self);

                match transport.execute(&ApiRequest::post(REFRESH_ENDPOINT)).await {
                    Ok(_) => {
                        let released = cycle.settle(Ok(()));
                        info!(released, "session refreshed");
                        retry(transport, &pending).await
                    }
                    Err(refresh_err) => {
                        let released = cycle.settle(Err(RefreshFailed));
                        warn!(released, error = %refresh_err, "token refresh failed");
                        self.announce_expiry();
                        Err(err)
                    }
                }
            }
        }
    }

    /// Broadcasts session expiry unless the app already sits on the public root.
    fn announce_expiry(&self) {
        let current = self.location.pathname();
        if current == routes::HOME {
            debug!("already on the public root, not announcing session expiry");
            return;
        }
        warn!(from = %current, "session expired");
        self.announcer.announce();
    }
}

/// Holds the refresh claim; dropping it unsettled releases the waiters with a failure.
struct RefreshCycle<'a> {
    coordinator: &'a RefreshCoordinator,
    armed: bool,
}

impl<'a> RefreshCycle<'a> {
    fn new(coordinator: &'a RefreshCoordinator) -> Self {
        Self {
            coordinator,
            armed: true,
        }
    }

    fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.armed = false;
        self.coordinator.state().drain(outcome)
    }
}

impl Drop for RefreshCycle<'_> {
    fn drop(&mut self) {
        if self.armed {
            let released = self.coordinator.state().drain(Err(RefreshFailed));
            warn!(released, "refresh abandoned before settling");
        }
    }
}

/// Re-sends a request after a successful refresh. It is already marked retried,
/// so a second 401 is final.
async fn retry(transport: &Transport, pending: &PendingRequest) -> Result<ApiResponse, ClientError> {
    debug!("retrying request after refresh");
    transport
        .execute(&pending.request)
        .await
        .map_err(|err| match err.status() {
            Some(_) => log_api_error(err),
            None => err,
        })
}

fn is_refresh_exempt(request: &ApiRequest) -> bool {
    request.targets(REFRESH_ENDPOINT) || request.targets(STATUS_ENDPOINT)
}

fn log_api_error(err: ClientError) -> ClientError {
    if let ClientError::Http { status, url, body } = &err {
        error!(
            status = status.as_u16(),
            payload = ?body,
            url = %url,
            "API error"
        );
    }
    err
}
