//! Server Configuration
//!
//! Read once from the environment at startup.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use kernel::id::UserId;
use two_factor::{InvalidationScope, TwoFactorConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Service account recorded as `updated_by` for seeded settings
    pub system_actor: UserId,
    pub two_factor: TwoFactorConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let system_actor = env::var("SYSTEM_ACTOR_ID")
            .context("SYSTEM_ACTOR_ID must be set to the service account id")?
            .parse::<UserId>()
            .context("SYSTEM_ACTOR_ID must be a UUID")?;

        let bind_addr = parse_var("BIND_ADDR", DEFAULT_BIND_ADDR.parse::<SocketAddr>()?)?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let defaults = TwoFactorConfig::default();
        let two_factor = TwoFactorConfig {
            code_ttl: secs_var("TWO_FACTOR_CODE_TTL_SECS", defaults.code_ttl)?,
            invalidation_scope: match env::var("TWO_FACTOR_INVALIDATION_SCOPE") {
                Ok(raw) => raw
                    .parse::<InvalidationScope>()
                    .map_err(|e| anyhow!(e))
                    .context("TWO_FACTOR_INVALIDATION_SCOPE")?,
                Err(_) => defaults.invalidation_scope,
            },
            sweep_interval: secs_var("TWO_FACTOR_SWEEP_INTERVAL_SECS", defaults.sweep_interval)?,
            sweep_grace: secs_var("TWO_FACTOR_SWEEP_GRACE_SECS", defaults.sweep_grace)?,
            ..defaults
        };

        two_factor
            .validate()
            .map_err(|e| anyhow!(e))
            .context("invalid TWO_FACTOR_* settings")?;

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            system_actor,
            two_factor,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn secs_var(name: &str, default: Duration) -> anyhow::Result<Duration> {
    parse_var(name, default.as_secs()).map(Duration::from_secs)
}
