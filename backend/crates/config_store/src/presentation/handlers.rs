//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use kernel::id::UserId;

use crate::application::ConfigStore;
use crate::domain::repository::ConfigEntryRepository;
use crate::domain::value_objects::ConfigValue;
use crate::error::{ConfigError, ConfigResult};
use crate::presentation::dto::{
    ConfigEntryResponse, ConfigListResponse, ListConfigQuery, SetConfigRequest,
};

/// Header carrying the acting user, set by the identity layer in front of this service
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Shared state for config handlers
#[derive(Clone)]
pub struct ConfigAppState<R>
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    pub store: ConfigStore<R>,
}

/// GET /api/settings
pub async fn list_configs<R>(
    State(state): State<ConfigAppState<R>>,
    Query(query): Query<ListConfigQuery>,
) -> ConfigResult<Json<ConfigListResponse>>
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    let entries = state.store.list(query.category.as_deref()).await?;

    Ok(Json(ConfigListResponse {
        entries: entries.into_iter().map(ConfigEntryResponse::from).collect(),
    }))
}

/// GET /api/settings/{key}
pub async fn get_config<R>(
    State(state): State<ConfigAppState<R>>,
    Path(key): Path<String>,
) -> ConfigResult<Json<ConfigEntryResponse>>
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    let entry = state.store.get_entry(&key).await?;
    Ok(Json(entry.into()))
}

/// PUT /api/settings/{key}
pub async fn set_config<R>(
    State(state): State<ConfigAppState<R>>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(req): Json<SetConfigRequest>,
) -> ConfigResult<Json<ConfigEntryResponse>>
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    let actor = extract_actor(&headers)?;
    let value = ConfigValue::try_from(req.value)?;

    let entry = state
        .store
        .set_config(&key, value, req.description, actor)
        .await?;

    Ok(Json(entry.into()))
}

/// DELETE /api/settings/{key}
pub async fn deactivate_config<R>(
    State(state): State<ConfigAppState<R>>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> ConfigResult<impl IntoResponse>
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    let actor = extract_actor(&headers)?;

    if !state.store.deactivate(&key, actor).await? {
        return Err(ConfigError::NotFound(key));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn extract_actor(headers: &HeaderMap) -> ConfigResult<UserId> {
    let raw = headers
        .get(ACTOR_HEADER)
        .ok_or(ConfigError::MissingActor)?
        .to_str()
        .map_err(|_| ConfigError::InvalidActor("header is not visible ASCII".to_string()))?;

    Ok(raw.parse::<UserId>()?)
}
