//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entity (ConfigEntry)
//! - Value objects (ConfigKey, ConfigValue)
//! - Typed settings known to the marketplace
//! - Repository traits (interfaces)

pub mod entity;
pub mod repository;
pub mod settings;
pub mod value_objects;

pub use entity::{ConfigEntry, ConfigUpsert};
pub use repository::ConfigEntryRepository;
pub use value_objects::{ConfigKey, ConfigValue};
