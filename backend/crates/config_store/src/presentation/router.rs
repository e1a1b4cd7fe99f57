//! Config Router

use axum::{Router, routing::get};

use crate::application::ConfigStore;
use crate::domain::repository::ConfigEntryRepository;
use crate::infra::postgres::PgConfigRepository;
use crate::presentation::handlers::{self, ConfigAppState};

/// Create the settings router with PostgreSQL repository
pub fn config_router(store: ConfigStore<PgConfigRepository>) -> Router {
    config_router_generic(store)
}

/// Create a settings router for any repository implementation
pub fn config_router_generic<R>(store: ConfigStore<R>) -> Router
where
    R: ConfigEntryRepository + Clone + Send + Sync + 'static,
{
    let state = ConfigAppState { store };

    Router::new()
        .route("/", get(handlers::list_configs::<R>))
        .route(
            "/{key}",
            get(handlers::get_config::<R>)
                .put(handlers::set_config::<R>)
                .delete(handlers::deactivate_config::<R>),
        )
        .with_state(state)
}
