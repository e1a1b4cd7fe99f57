//! Issue Code Use Case
//!
//! Replaces any outstanding code for the email with a fresh one.

use std::sync::Arc;

use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::domain::entities::TwoFactorCode;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::services::generate_code;
use crate::domain::value_objects::{CodePurpose, Email};
use crate::error::TwoFactorResult;

/// Issue Code Use Case
pub struct IssueCodeUseCase<R>
where
    R: TwoFactorCodeRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    config: Arc<TwoFactorConfig>,
}

impl<R> IssueCodeUseCase<R>
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

    /// Create and store a new code. The caller is responsible for delivery.
    pub async fn execute(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> TwoFactorResult<TwoFactorCode> {
        let email = Email::new(email)?;
        let now = self.clock.now();

        let code = TwoFactorCode::issue(
            email,
            purpose,
            generate_code()?,
            self.config.code_ttl_delta(),
            now,
        )?;

        let invalidated = self
            .repo
            .replace_outstanding(
                &code,
                self.config.invalidation_scope.purpose_filter(purpose),
                now,
            )
            .await?;

        tracing::info!(
            code_id = %code.id,
            email = %code.email.log_tag(),
            purpose = %purpose,
            invalidated,
            expires_at = %code.expires_at,
            "Issued two-factor code"
        );

        Ok(code)
    }
}
