//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use kernel::id::UserId;

use crate::domain::entity::{ConfigEntry, ConfigUpsert};
use crate::domain::value_objects::ConfigKey;
use crate::error::ConfigResult;

/// Config entry repository trait
#[trait_variant::make(ConfigEntryRepository: Send)]
pub trait LocalConfigEntryRepository {
    /// Find the active entry for a key
    async fn find_active(&self, key: &ConfigKey) -> ConfigResult<Option<ConfigEntry>>;

    /// Atomically update the entry for `upsert.key` or create it; always leaves it active
    async fn upsert(&self, upsert: &ConfigUpsert) -> ConfigResult<ConfigEntry>;

    /// Insert unless an entry (active or not) already exists for the key.
    /// Returns true if inserted.
    async fn insert_if_absent(&self, entry: &ConfigEntry) -> ConfigResult<bool>;

    /// All active entries, ordered by category then key
    async fn list_active(&self, category: Option<&str>) -> ConfigResult<Vec<ConfigEntry>>;

    /// Mark the entry inactive. Returns false if there was no active entry.
    async fn deactivate(&self, key: &ConfigKey, updated_by: UserId) -> ConfigResult<bool>;
}
