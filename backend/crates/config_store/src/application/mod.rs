//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config_store;
pub mod seed;

pub use config_store::ConfigStore;
pub use seed::seed_defaults;
