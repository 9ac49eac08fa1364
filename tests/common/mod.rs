//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use promptgate::{
    CoordinatorConfig, DismissalStore, InMemoryDismissalStore, StorageError, TriggerCoordinator,
};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A started coordinator with default thresholds and a fresh in-memory store.
pub fn started() -> (TriggerCoordinator, Arc<InMemoryDismissalStore>) {
    started_with(CoordinatorConfig::default(), InMemoryDismissalStore::new())
}

pub fn started_with(
    config: CoordinatorConfig,
    store: InMemoryDismissalStore,
) -> (TriggerCoordinator, Arc<InMemoryDismissalStore>) {
    let store = Arc::new(store);
    let coordinator = TriggerCoordinator::new(config, store.clone());
    coordinator.start().expect("coordinator should start inside a runtime");
    (coordinator, store)
}

/// Advance the paused clock by `ms` milliseconds.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Store whose reads and writes always fail.
pub struct FailingStore;

impl DismissalStore for FailingStore {
    fn read(&self) -> Result<bool, StorageError> {
        Err(StorageError::Unavailable("storage blocked".to_string()))
    }

    fn write(&self, _has_seen_load_prompt: bool) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage blocked".to_string()))
    }
}
