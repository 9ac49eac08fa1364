//! Configuration management infrastructure
//!
//! Layered configuration using figment: built-in defaults, then
//! `.promptgate/config.yaml`, then `.promptgate/local.yaml`, then
//! `PROMPTGATE_*` environment variables. `ConfigLoader::validate` rejects
//! thresholds the coordinator cannot honor.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
