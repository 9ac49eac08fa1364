//! Null dismissal store implementation.
//!
//! Used when storage is disabled but the coordinator still needs a
//! `DismissalStore`.

use crate::domain::errors::StorageResult;
use super::DismissalStore;

/// A no-op store that remembers nothing.
///
/// Every session behaves like a first visit.
#[derive(Debug, Clone, Default)]
pub struct NullDismissalStore;

impl NullDismissalStore {
    pub fn new() -> Self {
        Self
    }
}

impl DismissalStore for NullDismissalStore {
    fn read(&self) -> StorageResult<bool> {
        Ok(false)
    }

    fn write(&self, _has_seen_load_prompt: bool) -> StorageResult<()> {
        Ok(())
    }
}
