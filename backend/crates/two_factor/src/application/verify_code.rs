//! Verify Code Use Case
//!
//! Checks run in a fixed order: expired, used, out of attempts. The attempt
//! is counted and stored before the code is compared.

use std::sync::Arc;

use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::domain::entities::TwoFactorCode;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::value_objects::{CodePurpose, Email};
use crate::error::{TwoFactorError, TwoFactorResult};

/// Verify Code Use Case
pub struct VerifyCodeUseCase<R>
where
    R: TwoFactorCodeRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    config: Arc<TwoFactorConfig>,
}

impl<R> VerifyCodeUseCase<R>
where
    R: TwoFactorCodeRepository,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, config: Arc<TwoFactorConfig>) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// Verify `input` against a specific code
    pub async fn verify(&self, code: &TwoFactorCode, input: &str) -> TwoFactorResult<()> {
        let now = self.clock.now();
        let max_attempts = self.config.max_attempts;

        code.ensure_verifiable(now, max_attempts)?;

        let Some(attempted) = self.repo.record_attempt(code.id, now, max_attempts).await? else {
            return Err(self.reclassify(code).await);
        };

        if !attempted.code.matches(input) {
            let remaining_attempts = attempted.remaining_attempts(max_attempts);
            tracing::warn!(
                code_id = %code.id,
                attempts = attempted.attempts,
                remaining_attempts,
                "Invalid two-factor code"
            );
            return Err(TwoFactorError::InvalidCode { remaining_attempts });
        }

        if !self.repo.mark_used(code.id, now).await? {
            return Err(self.reclassify(code).await);
        }

        tracing::info!(
            code_id = %code.id,
            email = %code.email.log_tag(),
            purpose = %code.purpose,
            attempts = attempted.attempts,
            "Two-factor code verified"
        );

        Ok(())
    }

    /// Verify `input` against the most recent code for the email and purpose
    pub async fn verify_latest(
        &self,
        email: &str,
        purpose: CodePurpose,
        input: &str,
    ) -> TwoFactorResult<()> {
        let email = Email::new(email)?;

        let code = self
            .repo
            .find_latest(&email, purpose)
            .await?
            .ok_or(TwoFactorError::CodeNotFound)?;

        self.verify(&code, input).await
    }

    /// Explain why a conditional update matched nothing
    ///
    /// Another request changed or removed the record in between. The stored
    /// state decides; a purged record falls back to its own expiry.
    async fn reclassify(&self, code: &TwoFactorCode) -> TwoFactorError {
        let now = self.clock.now();
        match self.repo.find_by_id(code.id).await {
            Ok(Some(current)) => match current.ensure_verifiable(now, self.config.max_attempts) {
                Err(e) => e,
                Ok(()) => TwoFactorError::Internal(format!(
                    "conditional update on code {} matched nothing",
                    code.id
                )),
            },
            Ok(None) if code.is_expired_at(now) => TwoFactorError::Expired,
            Ok(None) => TwoFactorError::CodeNotFound,
            Err(e) => e,
        }
    }
}
