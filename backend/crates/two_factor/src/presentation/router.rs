//! Two-Factor Router

use std::sync::Arc;

use axum::{Router, routing::post};
use config_store::{ConfigEntryRepository, ConfigStore, PgConfigRepository};
use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::domain::mailer::CodeMailer;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::infra::mailer::TracingMailer;
use crate::infra::postgres::PgTwoFactorRepository;
use crate::presentation::handlers::{self, TwoFactorAppState};

/// Create the two-factor router with PostgreSQL repositories and the logging mailer
pub fn two_factor_router(
    config_store: ConfigStore<PgConfigRepository>,
    repo: Arc<PgTwoFactorRepository>,
    clock: Arc<dyn Clock>,
    config: TwoFactorConfig,
) -> Router {
    two_factor_router_generic(config_store, repo, Arc::new(TracingMailer), clock, config)
}

/// Create a generic two-factor router for any repository and mailer
pub fn two_factor_router_generic<C, R, M>(
    config_store: ConfigStore<C>,
    repo: Arc<R>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    config: TwoFactorConfig,
) -> Router
where
    C: ConfigEntryRepository + Clone + Send + Sync + 'static,
    R: TwoFactorCodeRepository + Clone + Send + Sync + 'static,
    M: CodeMailer + Clone + Send + Sync + 'static,
{
    let state = TwoFactorAppState {
        config_store,
        repo,
        mailer,
        clock,
        config: Arc::new(config),
    };

    Router::new()
        .route("/codes", post(handlers::issue_code::<C, R, M>))
        .route("/codes/verify", post(handlers::verify_code::<C, R, M>))
        .route("/login/begin", post(handlers::begin_login::<C, R, M>))
        .route("/login/complete", post(handlers::complete_login::<C, R, M>))
        .with_state(state)
}
