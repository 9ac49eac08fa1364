//! Promptgate - engagement prompt trigger coordinator
//!
//! Decides when a page shows an engagement prompt. Four triggers are
//! observed per session: a fixed-delay Load prompt, plus Scroll depth,
//! Exit intent and Inactivity, which compete for a single engagement slot.
//! Load dismissals persist across sessions through a `DismissalStore`.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Trigger state machine, host signals, ports
//! - **Service Layer** (`services`): The session coordinator
//! - **Infrastructure Layer** (`infrastructure`): Storage, config and logging adapters
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use promptgate::{InMemoryDismissalStore, TriggerCoordinator, TriggerKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let coordinator = TriggerCoordinator::with_defaults(Arc::new(InMemoryDismissalStore::new()));
//!     coordinator.start()?;
//!     coordinator.scroll(1200.0, 3000.0, 900.0);
//!     if coordinator.is_visible(TriggerKind::Scroll) {
//!         coordinator.acknowledge(TriggerKind::Scroll);
//!     }
//!     coordinator.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CoordinatorError, StorageError};
pub use domain::models::{
    ActivityKind, Config, CoordinatorConfig, CoordinatorSnapshot, HostEvent, LoggingConfig,
    StorageConfig, TriggerKind, TriggerPhase, LOAD_PROMPT_DELAY,
};
pub use domain::ports::{DismissalStore, NullDismissalStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::storage::{InMemoryDismissalStore, JsonFileDismissalStore};
pub use services::{PromptEvent, PromptTransition, TriggerCoordinator};
