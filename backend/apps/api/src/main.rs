//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use config_store::{ConfigStore, PgConfigRepository, config_router, seed_defaults};
use platform::clock::{Clock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use two_factor::{
    PgTwoFactorRepository, purge_expired_codes, spawn_expiry_sweeper, two_factor_router,
};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,config_store=info,two_factor=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Settings: create any missing defaults on behalf of the service account
    let config_repo = PgConfigRepository::new(pool.clone());
    seed_defaults(&config_repo, config.system_actor).await?;
    let config_store = ConfigStore::new(Arc::new(config_repo));

    // Startup cleanup: remove expired codes
    // Errors here should not prevent server startup
    let code_repo = Arc::new(PgTwoFactorRepository::new(pool.clone()));
    if let Err(e) = purge_expired_codes(
        code_repo.as_ref(),
        clock.as_ref(),
        config.two_factor.sweep_grace_delta(),
    )
    .await
    {
        tracing::warn!(error = %e, "Two-factor code cleanup failed, continuing anyway");
    }

    let _sweeper = spawn_expiry_sweeper(
        code_repo.clone(),
        clock.clone(),
        config.two_factor.sweep_interval,
        config.two_factor.sweep_grace_delta(),
    );

    tracing::info!(
        code_ttl_secs = config.two_factor.code_ttl.as_secs(),
        max_attempts = config.two_factor.max_attempts,
        invalidation_scope = %config.two_factor.invalidation_scope,
        "Two-factor verification configured"
    );

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-actor-id"),
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/settings", config_router(config_store.clone()))
        .nest(
            "/api/2fa",
            two_factor_router(config_store, code_repo, clock, config.two_factor.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
