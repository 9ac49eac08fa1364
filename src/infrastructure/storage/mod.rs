//! Dismissal storage adapters
//!
//! - `JsonFileDismissalStore`: durable JSON record on disk
//! - `InMemoryDismissalStore`: process-local, for tests and embedding
//!
//! `store_from_config` picks the adapter for a `StorageConfig`.

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use crate::domain::models::StorageConfig;
use crate::domain::ports::{DismissalStore, NullDismissalStore};

pub use json_file::{DismissalRecord, JsonFileDismissalStore};
pub use memory::InMemoryDismissalStore;

/// Build the dismissal store described by the configuration.
pub fn store_from_config(config: &StorageConfig) -> Arc<dyn DismissalStore> {
    if config.enabled {
        Arc::new(JsonFileDismissalStore::new(&config.path))
    } else {
        Arc::new(NullDismissalStore::new())
    }
}
