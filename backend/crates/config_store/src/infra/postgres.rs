//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ConfigEntryId, UserId};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{ConfigEntry, ConfigUpsert};
use crate::domain::repository::ConfigEntryRepository;
use crate::domain::value_objects::{ConfigKey, ConfigValue};
use crate::error::{ConfigError, ConfigResult};

/// PostgreSQL-backed config repository
#[derive(Clone)]
pub struct PgConfigRepository {
    pool: PgPool,
}

impl PgConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ConfigEntryRepository for PgConfigRepository {
    async fn find_active(&self, key: &ConfigKey) -> ConfigResult<Option<ConfigEntry>> {
        let row = sqlx::query_as::<_, ConfigEntryRow>(
            r#"
            SELECT
                config_entry_id,
                config_key,
                config_value,
                description,
                category,
                is_active,
                updated_by,
                created_at,
                updated_at
            FROM system_configs
            WHERE config_key = $1 AND is_active
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConfigEntryRow::into_entry).transpose()
    }

    async fn upsert(&self, upsert: &ConfigUpsert) -> ConfigResult<ConfigEntry> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, ConfigEntryRow>(
            r#"
            INSERT INTO system_configs (
                config_entry_id,
                config_key,
                config_value,
                description,
                category,
                is_active,
                updated_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $7)
            ON CONFLICT (config_key) DO UPDATE SET
                config_value = EXCLUDED.config_value,
                description = COALESCE(EXCLUDED.description, system_configs.description),
                category = COALESCE(EXCLUDED.category, system_configs.category),
                is_active = TRUE,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING
                config_entry_id,
                config_key,
                config_value,
                description,
                category,
                is_active,
                updated_by,
                created_at,
                updated_at
            "#,
        )
        .bind(ConfigEntryId::new().into_uuid())
        .bind(upsert.key.as_str())
        .bind(JsonValue::from(upsert.value.clone()))
        .bind(upsert.description.as_deref())
        .bind(upsert.category.as_deref())
        .bind(upsert.updated_by.into_uuid())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row.into_entry()
    }

    async fn insert_if_absent(&self, entry: &ConfigEntry) -> ConfigResult<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO system_configs (
                config_entry_id,
                config_key,
                config_value,
                description,
                category,
                is_active,
                updated_by,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (config_key) DO NOTHING
            "#,
        )
        .bind(entry.id.into_uuid())
        .bind(entry.key.as_str())
        .bind(JsonValue::from(entry.value.clone()))
        .bind(entry.description.as_deref())
        .bind(entry.category.as_deref())
        .bind(entry.is_active)
        .bind(entry.updated_by.into_uuid())
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn list_active(&self, category: Option<&str>) -> ConfigResult<Vec<ConfigEntry>> {
        let rows = sqlx::query_as::<_, ConfigEntryRow>(
            r#"
            SELECT
                config_entry_id,
                config_key,
                config_value,
                description,
                category,
                is_active,
                updated_by,
                created_at,
                updated_at
            FROM system_configs
            WHERE is_active AND ($1::TEXT IS NULL OR category = $1)
            ORDER BY category NULLS LAST, config_key
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ConfigEntryRow::into_entry).collect()
    }

    async fn deactivate(&self, key: &ConfigKey, updated_by: UserId) -> ConfigResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE system_configs
            SET is_active = FALSE, updated_by = $2, updated_at = $3
            WHERE config_key = $1 AND is_active
            "#,
        )
        .bind(key.as_str())
        .bind(updated_by.into_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ConfigEntryRow {
    config_entry_id: Uuid,
    config_key: String,
    config_value: JsonValue,
    description: Option<String>,
    category: Option<String>,
    is_active: bool,
    updated_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConfigEntryRow {
    fn into_entry(self) -> ConfigResult<ConfigEntry> {
        let value = ConfigValue::try_from(self.config_value).map_err(|e| {
            ConfigError::Internal(format!(
                "stored value for '{}' is unreadable: {e}",
                self.config_key
            ))
        })?;

        Ok(ConfigEntry {
            id: ConfigEntryId::from_uuid(self.config_entry_id),
            key: ConfigKey::from_db(self.config_key),
            value,
            description: self.description,
            category: self.category,
            is_active: self.is_active,
            updated_by: UserId::from_uuid(self.updated_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
