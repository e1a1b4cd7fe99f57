//! Domain Entities
//!
//! Core business entities for the config store.

use chrono::{DateTime, Utc};
use kernel::id::{ConfigEntryId, UserId};

use crate::domain::value_objects::{ConfigKey, ConfigValue};

/// ConfigEntry entity - one named system setting with audit metadata
///
/// `key` never changes after creation. At most one entry exists per key;
/// inactive entries are kept for history but are invisible to reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub id: ConfigEntryId,
    pub key: ConfigKey,
    pub value: ConfigValue,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
    /// Last acting user; audit trail only
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    /// Create a new active entry
    pub fn new(key: ConfigKey, value: ConfigValue, updated_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ConfigEntryId::new(),
            key,
            value,
            description: None,
            category: None,
            is_active: true,
            updated_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Build the entry an upsert creates when the key is new
    pub fn from_upsert(upsert: &ConfigUpsert) -> Self {
        Self {
            description: upsert.description.clone(),
            category: upsert.category.clone(),
            ..Self::new(upsert.key.clone(), upsert.value.clone(), upsert.updated_by)
        }
    }

    /// Apply an upsert to an existing entry
    ///
    /// Always reactivates. Absent description/category keep their current value.
    pub fn apply(&mut self, upsert: &ConfigUpsert) {
        self.value = upsert.value.clone();
        if let Some(description) = &upsert.description {
            self.description = Some(description.clone());
        }
        if let Some(category) = &upsert.category {
            self.category = Some(category.clone());
        }
        self.is_active = true;
        self.updated_by = upsert.updated_by;
        self.updated_at = Utc::now();
    }

    /// Hide the entry from reads without deleting it
    pub fn deactivate(&mut self, updated_by: UserId) {
        self.is_active = false;
        self.updated_by = updated_by;
        self.updated_at = Utc::now();
    }
}

/// Upsert command keyed by `key`
#[derive(Debug, Clone)]
pub struct ConfigUpsert {
    pub key: ConfigKey,
    pub value: ConfigValue,
    pub description: Option<String>,
    pub category: Option<String>,
    pub updated_by: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(value: ConfigValue, description: Option<&str>) -> ConfigUpsert {
        ConfigUpsert {
            key: ConfigKey::new("maintenance_mode").unwrap(),
            value,
            description: description.map(str::to_string),
            category: None,
            updated_by: UserId::new(),
        }
    }

    #[test]
    fn test_from_upsert_is_active() {
        let cmd = upsert(true.into(), Some("Site offline"));
        let entry = ConfigEntry::from_upsert(&cmd);
        assert!(entry.is_active);
        assert_eq!(entry.key.as_str(), "maintenance_mode");
        assert_eq!(entry.description.as_deref(), Some("Site offline"));
        assert_eq!(entry.updated_by, cmd.updated_by);
    }

    #[test]
    fn test_apply_reactivates_and_keeps_description() {
        let mut entry = ConfigEntry::from_upsert(&upsert(true.into(), Some("Site offline")))
            .with_category("system");
        let created_at = entry.created_at;
        let id = entry.id;
        entry.deactivate(UserId::new());
        assert!(!entry.is_active);

        let cmd = upsert(false.into(), None);
        entry.apply(&cmd);

        assert!(entry.is_active);
        assert_eq!(entry.value, ConfigValue::Bool(false));
        assert_eq!(entry.description.as_deref(), Some("Site offline"));
        assert_eq!(entry.category.as_deref(), Some("system"));
        assert_eq!(entry.updated_by, cmd.updated_by);
        assert_eq!(entry.id, id);
        assert_eq!(entry.created_at, created_at);
    }
}
