//! In-memory Repository Implementation
//!
//! Process-local store for tests and local development. Every operation
//! holds one lock for its whole duration, so upserts are atomic.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::UserId;

use crate::domain::entity::{ConfigEntry, ConfigUpsert};
use crate::domain::repository::ConfigEntryRepository;
use crate::domain::value_objects::ConfigKey;
use crate::error::{ConfigError, ConfigResult};

#[derive(Clone, Default)]
pub struct InMemoryConfigRepository {
    entries: Arc<Mutex<BTreeMap<ConfigKey, ConfigEntry>>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored entry, including inactive ones
    pub fn snapshot(&self) -> ConfigResult<Vec<ConfigEntry>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, BTreeMap<ConfigKey, ConfigEntry>>> {
        self.entries
            .lock()
            .map_err(|_| ConfigError::Internal("config store lock poisoned".to_string()))
    }
}

impl ConfigEntryRepository for InMemoryConfigRepository {
    async fn find_active(&self, key: &ConfigKey) -> ConfigResult<Option<ConfigEntry>> {
        Ok(self.lock()?.get(key).filter(|e| e.is_active).cloned())
    }

    async fn upsert(&self, upsert: &ConfigUpsert) -> ConfigResult<ConfigEntry> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(upsert.key.clone())
            .and_modify(|e| e.apply(upsert))
            .or_insert_with(|| ConfigEntry::from_upsert(upsert));
        Ok(entry.clone())
    }

    async fn insert_if_absent(&self, entry: &ConfigEntry) -> ConfigResult<bool> {
        let mut entries = self.lock()?;
        if entries.contains_key(&entry.key) {
            return Ok(false);
        }
        entries.insert(entry.key.clone(), entry.clone());
        Ok(true)
    }

    async fn list_active(&self, category: Option<&str>) -> ConfigResult<Vec<ConfigEntry>> {
        let mut active: Vec<ConfigEntry> = self
            .lock()?
            .values()
            .filter(|e| e.is_active)
            .filter(|e| category.is_none_or(|c| e.category.as_deref() == Some(c)))
            .cloned()
            .collect();

        // Same order as the SQL: category (missing last), then key
        active.sort_by(|a, b| {
            (a.category.is_none(), &a.category, &a.key).cmp(&(
                b.category.is_none(),
                &b.category,
                &b.key,
            ))
        });

        Ok(active)
    }

    async fn deactivate(&self, key: &ConfigKey, updated_by: UserId) -> ConfigResult<bool> {
        match self.lock()?.get_mut(key) {
            Some(entry) if entry.is_active => {
                entry.deactivate(updated_by);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
