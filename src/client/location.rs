//! Where the application currently is. The refresh coordinator only reads it to
//! suppress session-expiry redirects on the public landing page; auth flows and
//! expiry subscribers navigate it.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

pub trait Location: Send + Sync {
    /// Current path (or absolute URL after an external redirect).
    fn pathname(&self) -> String;

    fn navigate(&self, href: &str);
}

/// In-process location shared by clones.
#[derive(Clone, Debug)]
pub struct SharedLocation {
    href: Arc<RwLock<String>>,
}

impl SharedLocation {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            href: Arc::new(RwLock::new(initial.to_string())),
        }
    }
}

impl Default for SharedLocation {
    fn default() -> Self {
        Self::new(crate::routes::HOME)
    }
}

impl Location for SharedLocation {
    fn pathname(&self) -> String {
        self.href
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, href: &str) {
        debug!(href, "navigating");
        let mut current = self.href.write().unwrap_or_else(PoisonError::into_inner);
        *current = href.to_string();
    }
}
