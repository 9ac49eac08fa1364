//! Domain errors for the promptgate coordinator.
//!
//! Session operations never surface these to the page: storage failures
//! degrade to "load prompt not yet seen" and lifecycle misuse is reported
//! only at `start()`.

use thiserror::Error;

/// Errors raised by the trigger coordinator lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("No tokio runtime is available to run the prompt session")]
    NoRuntime,

    #[error("Prompt session already ended; a coordinator runs a single session")]
    SessionEnded,
}

/// Errors raised by dismissal storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
pub type StorageResult<T> = Result<T, StorageError>;
