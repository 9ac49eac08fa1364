pub mod persisted_dismissal;
pub mod trigger_coordinator;

pub use persisted_dismissal::PersistedDismissal;
pub use trigger_coordinator::{PromptEvent, PromptTransition, TriggerCoordinator};
