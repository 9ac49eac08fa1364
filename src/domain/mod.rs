//! Domain layer for promptgate
//!
//! This module contains the trigger state machine, host signal types and
//! the storage port the coordinator depends on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{CoordinatorError, StorageError};
