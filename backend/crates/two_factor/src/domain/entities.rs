//! Domain Entities

use chrono::{DateTime, Duration, Utc};
use kernel::id::TwoFactorCodeId;

use crate::domain::value_objects::{CodePurpose, Email, VerificationCode};
use crate::error::{TwoFactorError, TwoFactorResult};

/// Emailed one-time code
///
/// Lifecycle: issued, then one attempt per verification until it is
/// consumed, invalidated by a newer code, expires or runs out of attempts.
/// Terminal states are never left.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoFactorCode {
    pub id: TwoFactorCodeId,
    pub email: Email,
    pub code: VerificationCode,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub attempts: u8,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TwoFactorCode {
    /// Create a fresh code valid for `ttl` from `now`
    pub fn issue(
        email: Email,
        purpose: CodePurpose,
        code: VerificationCode,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> TwoFactorResult<Self> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            TwoFactorError::Internal(format!("code ttl of {ttl} overflows the expiry time"))
        })?;

        Ok(Self {
            id: TwoFactorCodeId::new(),
            email,
            code,
            purpose,
            expires_at,
            attempts: 0,
            is_used: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Strictly after `expires_at`; the expiry instant itself is still valid
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn remaining_attempts(&self, max_attempts: u8) -> u8 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Reject a verification before it counts as an attempt
    ///
    /// Precedence: expired, then used, then out of attempts.
    pub fn ensure_verifiable(&self, now: DateTime<Utc>, max_attempts: u8) -> TwoFactorResult<()> {
        if self.is_expired_at(now) {
            return Err(TwoFactorError::Expired);
        }
        if self.is_used {
            return Err(TwoFactorError::AlreadyUsed);
        }
        if self.attempts >= max_attempts {
            return Err(TwoFactorError::AttemptsExceeded);
        }
        Ok(())
    }

    pub fn register_attempt(&mut self, now: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        self.updated_at = now;
    }

    /// Mark used, either on success or when replaced by a newer code
    pub fn consume(&mut self, now: DateTime<Utc>) {
        self.is_used = true;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(now: DateTime<Utc>) -> TwoFactorCode {
        TwoFactorCode::issue(
            Email::new("a@b.com").unwrap(),
            CodePurpose::Login,
            VerificationCode::from_number(482913).unwrap(),
            Duration::minutes(10),
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_issue_defaults() {
        let now = Utc::now();
        let c = code(now);
        assert_eq!(c.expires_at, now + Duration::minutes(10));
        assert_eq!(c.attempts, 0);
        assert!(!c.is_used);
        assert_eq!(c.created_at, now);
    }

    #[test]
    fn test_issue_with_overflowing_ttl_is_internal_error() {
        let result = TwoFactorCode::issue(
            Email::new("a@b.com").unwrap(),
            CodePurpose::Login,
            VerificationCode::from_number(482913).unwrap(),
            Duration::days(365 * 300_000),
            Utc::now(),
        );
        assert!(matches!(result, Err(TwoFactorError::Internal(_))));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let c = code(now);
        assert!(!c.is_expired_at(c.expires_at));
        assert!(c.is_expired_at(c.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_ensure_verifiable_precedence() {
        let now = Utc::now();
        let mut c = code(now);
        c.attempts = 3;
        c.is_used = true;

        let later = now + Duration::minutes(11);
        assert!(matches!(c.ensure_verifiable(later, 3), Err(TwoFactorError::Expired)));
        assert!(matches!(c.ensure_verifiable(now, 3), Err(TwoFactorError::AlreadyUsed)));

        c.is_used = false;
        assert!(matches!(
            c.ensure_verifiable(now, 3),
            Err(TwoFactorError::AttemptsExceeded)
        ));

        c.attempts = 2;
        assert!(c.ensure_verifiable(now, 3).is_ok());
        assert_eq!(c.remaining_attempts(3), 1);
    }

    #[test]
    fn test_attempt_and_consume_touch_updated_at() {
        let now = Utc::now();
        let mut c = code(now);
        let later = now + Duration::seconds(5);

        c.register_attempt(later);
        assert_eq!(c.attempts, 1);
        assert_eq!(c.updated_at, later);

        c.consume(later);
        assert!(c.is_used);
    }
}
