//! Send Code Use Case
//!
//! Issue a code and hand it to the mailer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::TwoFactorCodeId;
use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::application::issue_code::IssueCodeUseCase;
use crate::domain::mailer::CodeMailer;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::value_objects::CodePurpose;
use crate::error::{TwoFactorError, TwoFactorResult};

/// Output of a successful send
#[derive(Debug, Clone)]
pub struct SendCodeOutput {
    pub code_id: TwoFactorCodeId,
    pub expires_at: DateTime<Utc>,
}

/// Send Code Use Case
pub struct SendCodeUseCase<R, M>
where
    R: TwoFactorCodeRepository,
    M: CodeMailer,
{
    issue: IssueCodeUseCase<R>,
    mailer: Arc<M>,
}

impl<R, M> SendCodeUseCase<R, M>
where
    R: TwoFactorCodeRepository,
    M: CodeMailer,
{
    pub fn new(
        repo: Arc<R>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
        config: Arc<TwoFactorConfig>,
    ) -> Self {
        Self {
            issue: IssueCodeUseCase::new(repo, clock, config),
            mailer,
        }
    }

    /// The code stays stored when delivery fails, so a resend replaces it
    pub async fn execute(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> TwoFactorResult<SendCodeOutput> {
        let code = self.issue.execute(email, purpose).await?;

        if let Err(e) = self
            .mailer
            .send_code(&code.email, &code.code, code.purpose, code.expires_at)
            .await
        {
            tracing::warn!(
                code_id = %code.id,
                email = %code.email.log_tag(),
                error = %e,
                "Two-factor code stored but not delivered"
            );
            return Err(match e {
                TwoFactorError::Delivery(msg) => TwoFactorError::Delivery(msg),
                other => TwoFactorError::Delivery(other.to_string()),
            });
        }

        Ok(SendCodeOutput {
            code_id: code.id,
            expires_at: code.expires_at,
        })
    }
}
