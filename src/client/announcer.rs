//! Process-wide "session expired" notification. The refresh coordinator fires
//! it when a refresh fails; subscribers own their state reset and navigation.
//! Delivery is fire-and-forget: firing with no subscribers is not an error.

use tokio::sync::broadcast;
use tracing::debug;

/// Event name of the session-expired signal.
pub const SESSION_EXPIRED_EVENT: &str = "auth:session-expired";

const CHANNEL_CAPACITY: usize = 16;

/// Zero-payload signal broadcast once per failed refresh cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionExpired;

impl SessionExpired {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        SESSION_EXPIRED_EVENT
    }
}

#[derive(Clone, Debug)]
pub struct SessionAnnouncer {
    tx: broadcast::Sender<SessionExpired>,
}

impl SessionAnnouncer {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionExpired> {
        self.tx.subscribe()
    }

    /// Fires the signal and returns how many subscribers received it.
    pub fn announce(&self) -> usize {
        let delivered = self.tx.send(SessionExpired).unwrap_or(0);
        debug!(
            event = SESSION_EXPIRED_EVENT,
            delivered, "session expiry announced"
        );
        delivered
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}
