//! Port trait definitions (Hexagonal Architecture)
//!
//! - `DismissalStore`: durable storage of the "load prompt dismissed" flag
//!
//! Adapters live in `infrastructure::storage`.

pub mod dismissal_store;
pub mod null_dismissal;

pub use dismissal_store::DismissalStore;
pub use null_dismissal::NullDismissalStore;
