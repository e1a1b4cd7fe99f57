//! Login Gate Use Case
//!
//! Decides from the `2fa_enabled_for_login` setting whether a login needs an
//! emailed code, and checks that code when it does.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use config_store::{ConfigEntryRepository, ConfigStore};
use platform::clock::Clock;

use crate::application::config::TwoFactorConfig;
use crate::application::send_code::SendCodeUseCase;
use crate::application::verify_code::VerifyCodeUseCase;
use crate::domain::mailer::CodeMailer;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::value_objects::{CodePurpose, Email};
use crate::error::TwoFactorResult;

/// Outcome of the first login step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginChallenge {
    /// Two-factor login is switched off
    NotRequired,
    /// A login code was emailed
    CodeSent { expires_at: DateTime<Utc> },
}

/// Login Gate Use Case
pub struct LoginGateUseCase<C, R, M>
where
    C: ConfigEntryRepository,
    R: TwoFactorCodeRepository,
    M: CodeMailer,
{
    config_store: ConfigStore<C>,
    send: SendCodeUseCase<R, M>,
    verify: VerifyCodeUseCase<R>,
}

impl<C, R, M> LoginGateUseCase<C, R, M>
where
    C: ConfigEntryRepository,
    R: TwoFactorCodeRepository,
    M: CodeMailer,
{
    pub fn new(
        config_store: ConfigStore<C>,
        repo: Arc<R>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
        config: Arc<TwoFactorConfig>,
    ) -> Self {
        Self {
            config_store,
            send: SendCodeUseCase::new(repo.clone(), mailer, clock.clone(), config.clone()),
            verify: VerifyCodeUseCase::new(repo, clock, config),
        }
    }

    /// Called once the password has been accepted
    pub async fn begin(&self, email: &str) -> TwoFactorResult<LoginChallenge> {
        let email = Email::new(email)?;

        if !self.config_store.is_two_factor_required_for_login().await {
            tracing::debug!(email = %email.log_tag(), "Two-factor login not required");
            return Ok(LoginChallenge::NotRequired);
        }

        let sent = self.send.execute(email.as_str(), CodePurpose::Login).await?;

        Ok(LoginChallenge::CodeSent {
            expires_at: sent.expires_at,
        })
    }

    /// Succeeds without a code when two-factor login is switched off
    pub async fn complete(&self, email: &str, code: &str) -> TwoFactorResult<()> {
        let email = Email::new(email)?;

        if !self.config_store.is_two_factor_required_for_login().await {
            return Ok(());
        }

        self.verify
            .verify_latest(email.as_str(), CodePurpose::Login, code)
            .await
    }
}
