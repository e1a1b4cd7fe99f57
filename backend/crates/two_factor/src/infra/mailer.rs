//! Code Mailers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::mailer::CodeMailer;
use crate::domain::value_objects::{CodePurpose, Email, VerificationCode};
use crate::error::{TwoFactorError, TwoFactorResult};

/// Records a delivery event in the log instead of sending mail
///
/// Only the email digest is logged, never the address or the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

impl CodeMailer for TracingMailer {
    async fn send_code(
        &self,
        email: &Email,
        _code: &VerificationCode,
        purpose: CodePurpose,
        expires_at: DateTime<Utc>,
    ) -> TwoFactorResult<()> {
        tracing::info!(
            email = %email.log_tag(),
            purpose = %purpose,
            expires_at = %expires_at,
            "Two-factor code dispatched"
        );
        Ok(())
    }
}

/// A code handed to [`RecordingMailer`]
#[derive(Debug, Clone)]
pub struct SentCode {
    pub email: Email,
    pub code: VerificationCode,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
}

/// Keeps every message in memory; can be switched to fail
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentCode>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail with `Delivery`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentCode> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Code from the latest message to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let email = Email::new(email).ok()?;
        self.sent()
            .into_iter()
            .rev()
            .find(|m| m.email == email)
            .map(|m| m.code.as_str().to_string())
    }
}

impl CodeMailer for RecordingMailer {
    async fn send_code(
        &self,
        email: &Email,
        code: &VerificationCode,
        purpose: CodePurpose,
        expires_at: DateTime<Utc>,
    ) -> TwoFactorResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TwoFactorError::Delivery("mail channel unavailable".to_string()));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TwoFactorError::Internal("mailer lock poisoned".to_string()))?;
        sent.push(SentCode {
            email: email.clone(),
            code: code.clone(),
            purpose,
            expires_at,
        });
        Ok(())
    }
}
