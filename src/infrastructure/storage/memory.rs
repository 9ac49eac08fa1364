//! In-memory dismissal store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::errors::StorageResult;
use crate::domain::ports::DismissalStore;

/// Process-local `DismissalStore`.
///
/// Shares state across coordinators holding the same `Arc`, which makes it a
/// stand-in for browser storage shared by sessions. Counts writes so callers
/// can observe exactly when persistence was touched.
#[derive(Debug, Default)]
pub struct InMemoryDismissalStore {
    seen: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDismissalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already remembers a dismissed load prompt.
    pub fn seen() -> Self {
        Self {
            seen: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `write` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }
}

impl DismissalStore for InMemoryDismissalStore {
    fn read(&self) -> StorageResult<bool> {
        Ok(self.seen.load(Ordering::Acquire))
    }

    fn write(&self, has_seen_load_prompt: bool) -> StorageResult<()> {
        self.seen.store(has_seen_load_prompt, Ordering::Release);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
