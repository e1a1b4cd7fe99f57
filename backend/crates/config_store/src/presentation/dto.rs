//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::ConfigEntry;

/// Query for GET /api/settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListConfigQuery {
    pub category: Option<String>,
}

/// Request for PUT /api/settings/{key}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigRequest {
    pub value: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
}

/// One configuration entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntryResponse {
    pub id: String,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
    pub updated_by: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl From<ConfigEntry> for ConfigEntryResponse {
    fn from(entry: ConfigEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            key: entry.key.to_string(),
            value: entry.value.into_json(),
            description: entry.description,
            category: entry.category,
            is_active: entry.is_active,
            updated_by: entry.updated_by.to_string(),
            created_at_ms: entry.created_at.timestamp_millis(),
            updated_at_ms: entry.updated_at.timestamp_millis(),
        }
    }
}

/// Response for GET /api/settings
#[derive(Debug, Clone, Serialize)]
pub struct ConfigListResponse {
    pub entries: Vec<ConfigEntryResponse>,
}
