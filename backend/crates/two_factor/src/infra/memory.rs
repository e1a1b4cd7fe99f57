//! In-memory Repository Implementation
//!
//! Process-local store for tests and local development. Each operation
//! runs under a single lock, which gives the same atomicity as the
//! conditional updates in PostgreSQL.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use kernel::id::TwoFactorCodeId;

use crate::domain::entities::TwoFactorCode;
use crate::domain::repository::TwoFactorCodeRepository;
use crate::domain::value_objects::{CodePurpose, Email};
use crate::error::{TwoFactorError, TwoFactorResult};

/// Codes in issue order
#[derive(Clone, Default)]
pub struct InMemoryTwoFactorRepository {
    codes: Arc<Mutex<Vec<TwoFactorCode>>>,
}

impl InMemoryTwoFactorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored code for `email`, oldest first
    pub fn codes_for(&self, email: &str) -> TwoFactorResult<Vec<TwoFactorCode>> {
        let email = Email::new(email)?;
        Ok(self
            .lock()?
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }

    pub fn len(&self) -> TwoFactorResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> TwoFactorResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> TwoFactorResult<MutexGuard<'_, Vec<TwoFactorCode>>> {
        self.codes
            .lock()
            .map_err(|_| TwoFactorError::Internal("two-factor store lock poisoned".to_string()))
    }
}

impl TwoFactorCodeRepository for InMemoryTwoFactorRepository {
    async fn replace_outstanding(
        &self,
        code: &TwoFactorCode,
        purpose: Option<CodePurpose>,
        now: DateTime<Utc>,
    ) -> TwoFactorResult<u64> {
        let mut codes = self.lock()?;
        let mut invalidated = 0;

        for existing in codes.iter_mut().filter(|c| {
            c.email == code.email
                && !c.is_used
                && !c.is_expired_at(now)
                && purpose.is_none_or(|p| c.purpose == p)
        }) {
            existing.consume(now);
            invalidated += 1;
        }

        codes.push(code.clone());
        Ok(invalidated)
    }

    async fn find_latest(
        &self,
        email: &Email,
        purpose: CodePurpose,
    ) -> TwoFactorResult<Option<TwoFactorCode>> {
        Ok(self
            .lock()?
            .iter()
            .rev()
            .find(|c| &c.email == email && c.purpose == purpose)
            .cloned())
    }

    async fn find_by_id(&self, id: TwoFactorCodeId) -> TwoFactorResult<Option<TwoFactorCode>> {
        Ok(self.lock()?.iter().find(|c| c.id == id).cloned())
    }

    async fn record_attempt(
        &self,
        id: TwoFactorCodeId,
        now: DateTime<Utc>,
        max_attempts: u8,
    ) -> TwoFactorResult<Option<TwoFactorCode>> {
        let mut codes = self.lock()?;
        let Some(code) = codes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if code.is_used || code.attempts >= max_attempts || code.is_expired_at(now) {
            return Ok(None);
        }

        code.register_attempt(now);
        Ok(Some(code.clone()))
    }

    async fn mark_used(&self, id: TwoFactorCodeId, now: DateTime<Utc>) -> TwoFactorResult<bool> {
        match self.lock()?.iter_mut().find(|c| c.id == id) {
            Some(code) if !code.is_used => {
                code.consume(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self, cutoff: DateTime<Utc>) -> TwoFactorResult<u64> {
        let mut codes = self.lock()?;
        let before = codes.len();
        codes.retain(|c| c.expires_at >= cutoff);
        Ok((before - codes.len()) as u64)
    }
}
