//! Best-effort wrapper around the dismissal store.
//!
//! Storage failures never reach the session: an unreadable store reads as
//! "not seen" and failed writes are logged and dropped.

use std::sync::Arc;

use crate::domain::ports::DismissalStore;

/// Persisted memory of a dismissed load prompt.
#[derive(Clone)]
pub struct PersistedDismissal {
    store: Arc<dyn DismissalStore>,
}

impl PersistedDismissal {
    pub fn new(store: Arc<dyn DismissalStore>) -> Self {
        Self { store }
    }

    /// Whether the visitor dismissed the load prompt on an earlier visit.
    pub fn has_seen_load_prompt(&self) -> bool {
        match self.store.read() {
            Ok(seen) => seen,
            Err(err) => {
                tracing::warn!(error = %err, "dismissal store unreadable; treating load prompt as unseen");
                false
            }
        }
    }

    /// Remember that the load prompt was dismissed.
    pub fn record_load_dismissed(&self) {
        match self.store.write(true) {
            Ok(()) => tracing::debug!("load prompt dismissal persisted"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist load prompt dismissal");
            }
        }
    }
}

impl std::fmt::Debug for PersistedDismissal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedDismissal").finish_non_exhaustive()
    }
}
