//! Config Store Service
//!
//! Read and write system settings. Reads never fail: any problem is logged
//! and the caller's default is returned. Writes surface every failure.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::{ConfigEntry, ConfigUpsert};
use crate::domain::repository::ConfigEntryRepository;
use crate::domain::settings::{Setting, SettingValue, TwoFactorEnabledForLogin};
use crate::domain::value_objects::{ConfigKey, ConfigValue};
use crate::error::{ConfigError, ConfigResult};

/// Config store service
pub struct ConfigStore<R>
where
    R: ConfigEntryRepository,
{
    repo: Arc<R>,
}

impl<R> Clone for ConfigStore<R>
where
    R: ConfigEntryRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R> ConfigStore<R>
where
    R: ConfigEntryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Value of the active entry for `key`, or `default`
    pub async fn get_config(&self, key: &str, default: ConfigValue) -> ConfigValue {
        match self.lookup(key).await {
            Ok(Some(entry)) => entry.value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Config lookup failed, using default");
                default
            }
        }
    }

    /// Typed read of a known setting
    ///
    /// A stored value of the wrong shape is treated like a missing one.
    pub async fn get<S: Setting>(&self) -> S::Value {
        match self.lookup(S::KEY).await {
            Ok(Some(entry)) => S::Value::from_config(&entry.value).unwrap_or_else(|| {
                tracing::warn!(
                    key = S::KEY,
                    found = entry.value.type_name(),
                    "Config value has unexpected shape, using default"
                );
                S::default_value()
            }),
            Ok(None) => S::default_value(),
            Err(e) => {
                tracing::warn!(key = S::KEY, error = %e, "Config lookup failed, using default");
                S::default_value()
            }
        }
    }

    /// Whether login must be confirmed with an emailed code. Off on any failure.
    pub async fn is_two_factor_required_for_login(&self) -> bool {
        self.get::<TwoFactorEnabledForLogin>().await
    }

    /// Full active entry for `key`
    pub async fn get_entry(&self, key: &str) -> ConfigResult<ConfigEntry> {
        self.lookup(key)
            .await?
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))
    }

    /// Upsert `key` and force it active
    ///
    /// A `None` description keeps the stored one.
    pub async fn set_config(
        &self,
        key: &str,
        value: ConfigValue,
        description: Option<String>,
        updated_by: UserId,
    ) -> ConfigResult<ConfigEntry> {
        let upsert = ConfigUpsert {
            key: ConfigKey::new(key)?,
            value,
            description,
            category: None,
            updated_by,
        };

        let entry = self.repo.upsert(&upsert).await?;

        tracing::info!(
            key = %entry.key,
            updated_by = %updated_by,
            value_type = entry.value.type_name(),
            "Config updated"
        );

        Ok(entry)
    }

    /// Typed write of a known setting
    pub async fn set<S: Setting>(
        &self,
        value: S::Value,
        updated_by: UserId,
    ) -> ConfigResult<ConfigEntry> {
        let upsert = ConfigUpsert {
            key: ConfigKey::new(S::KEY)?,
            value: value.into_config(),
            description: Some(S::DESCRIPTION.to_string()),
            category: Some(S::CATEGORY.to_string()),
            updated_by,
        };

        let entry = self.repo.upsert(&upsert).await?;

        tracing::info!(key = S::KEY, updated_by = %updated_by, "Config updated");

        Ok(entry)
    }

    /// Active entries, optionally restricted to one category
    pub async fn list(&self, category: Option<&str>) -> ConfigResult<Vec<ConfigEntry>> {
        self.repo.list_active(category).await
    }

    /// Hide `key` from reads, keeping its history. Returns false if it was not active.
    pub async fn deactivate(&self, key: &str, updated_by: UserId) -> ConfigResult<bool> {
        let key = ConfigKey::new(key)?;
        let deactivated = self.repo.deactivate(&key, updated_by).await?;

        if deactivated {
            tracing::info!(key = %key, updated_by = %updated_by, "Config deactivated");
        }

        Ok(deactivated)
    }

    async fn lookup(&self, key: &str) -> ConfigResult<Option<ConfigEntry>> {
        let key = ConfigKey::new(key)?;
        self.repo.find_active(&key).await
    }
}
