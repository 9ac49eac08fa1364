pub mod config;
pub mod signal;
pub mod state;
pub mod trigger;

pub use config::{Config, CoordinatorConfig, LoggingConfig, StorageConfig};
pub use signal::{ActivityKind, HostEvent, ScrollPosition};
pub use state::{CoordinatorSnapshot, CoordinatorState, FireOutcome, TriggerStatus};
pub use trigger::{TriggerKind, TriggerPhase, LOAD_PROMPT_DELAY};
