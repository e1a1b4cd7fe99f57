//! Config Store Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - ConfigEntry entity, value objects, typed settings, repository traits
//! - `application/` - ConfigStore service and default seeding
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Admin settings HTTP API
//!
//! ## Behaviour
//! - One entry per key; `set_config` upserts and always reactivates
//! - Inactive entries are invisible to reads but keep their history
//! - Reads never fail: errors degrade to the caller's default
//! - Writes surface every storage failure

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{ConfigStore, seed_defaults};
pub use domain::settings;
pub use domain::{ConfigEntry, ConfigEntryRepository, ConfigKey, ConfigValue};
pub use error::{ConfigError, ConfigResult};
pub use infra::{InMemoryConfigRepository, PgConfigRepository};
pub use presentation::router::{config_router, config_router_generic};

#[cfg(test)]
mod tests;
