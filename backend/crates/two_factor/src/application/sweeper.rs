//! Expiry Sweep
//!
//! Garbage collection only. Verification compares `expires_at` itself and
//! never relies on a code having been removed.

use std::sync::Arc;
use std::time::Duration;

use platform::clock::Clock;
use tokio::task::JoinHandle;

use crate::domain::repository::TwoFactorCodeRepository;
use crate::error::{TwoFactorError, TwoFactorResult};

/// Delete codes that expired more than `grace` ago
pub async fn purge_expired_codes<R>(
    repo: &R,
    clock: &dyn Clock,
    grace: chrono::Duration,
) -> TwoFactorResult<u64>
where
    R: TwoFactorCodeRepository,
{
    let cutoff = clock.now().checked_sub_signed(grace).ok_or_else(|| {
        TwoFactorError::Internal(format!("sweep grace of {grace} overflows the cutoff"))
    })?;
    let deleted = repo.purge_expired(cutoff).await?;

    if deleted > 0 {
        tracing::info!(deleted, cutoff = %cutoff, "Purged expired two-factor codes");
    } else {
        tracing::debug!(cutoff = %cutoff, "No expired two-factor codes to purge");
    }

    Ok(deleted)
}

/// Run [`purge_expired_codes`] every `interval` until the task is aborted
pub fn spawn_expiry_sweeper<R>(
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    grace: chrono::Duration,
) -> JoinHandle<()>
where
    R: TwoFactorCodeRepository + Sync + 'static,
{
    tokio::spawn(async move {
        tracing::info!(interval_secs = interval.as_secs(), "Starting two-factor expiry sweeper");

        loop {
            tokio::time::sleep(interval).await;

            if let Err(e) = purge_expired_codes(repo.as_ref(), clock.as_ref(), grace).await {
                tracing::warn!(error = %e, "Two-factor expiry sweep failed, retrying next tick");
            }
        }
    })
}
