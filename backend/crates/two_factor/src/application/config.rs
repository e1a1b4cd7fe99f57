//! Application Configuration
//!
//! Configuration for the two-factor application layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::value_objects::CodePurpose;

/// Which outstanding codes a newly issued code replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidationScope {
    /// Every unused code for the email, whatever its purpose
    #[default]
    Email,
    /// Only unused codes for the same email and purpose
    EmailAndPurpose,
}

impl InvalidationScope {
    /// Purpose filter handed to the repository
    pub fn purpose_filter(&self, purpose: CodePurpose) -> Option<CodePurpose> {
        match self {
            InvalidationScope::Email => None,
            InvalidationScope::EmailAndPurpose => Some(purpose),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidationScope::Email => "email",
            InvalidationScope::EmailAndPurpose => "email_and_purpose",
        }
    }
}

impl FromStr for InvalidationScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(InvalidationScope::Email),
            "email_and_purpose" => Ok(InvalidationScope::EmailAndPurpose),
            other => Err(format!(
                "unknown invalidation scope '{other}', expected 'email' or 'email_and_purpose'"
            )),
        }
    }
}

impl fmt::Display for InvalidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-factor application configuration
#[derive(Debug, Clone)]
pub struct TwoFactorConfig {
    /// Code lifetime
    pub code_ttl: Duration,
    /// Verification attempts per code
    pub max_attempts: u8,
    /// Which outstanding codes a new code invalidates
    pub invalidation_scope: InvalidationScope,
    /// Expiry sweep period
    pub sweep_interval: Duration,
    /// How long past `expires_at` a code is kept before the sweep removes it
    pub sweep_grace: Duration,
}

impl Default for TwoFactorConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::from_secs(10 * 60), // 10 minutes
            max_attempts: 3,
            invalidation_scope: InvalidationScope::Email,
            sweep_interval: Duration::from_secs(60),
            sweep_grace: Duration::ZERO,
        }
    }
}

impl TwoFactorConfig {
    /// Longest accepted code lifetime
    pub const MAX_CODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    /// Longest accepted sweep grace
    pub const MAX_SWEEP_GRACE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    /// Reject values that would make issuance or the sweep fail at runtime
    pub fn validate(&self) -> Result<(), String> {
        if self.code_ttl.is_zero() || self.code_ttl > Self::MAX_CODE_TTL {
            return Err(format!(
                "code ttl must be between 1 and {} seconds",
                Self::MAX_CODE_TTL.as_secs()
            ));
        }
        if self.max_attempts == 0 {
            return Err("max attempts must be greater than 0".to_string());
        }
        if self.sweep_interval.is_zero() {
            return Err("sweep interval must be greater than 0".to_string());
        }
        if self.sweep_grace > Self::MAX_SWEEP_GRACE {
            return Err(format!(
                "sweep grace must be at most {} seconds",
                Self::MAX_SWEEP_GRACE.as_secs()
            ));
        }
        Ok(())
    }

    /// Code lifetime as a chrono duration
    pub fn code_ttl_delta(&self) -> chrono::Duration {
        to_delta(self.code_ttl)
    }

    /// Sweep grace as a chrono duration
    pub fn sweep_grace_delta(&self) -> chrono::Duration {
        to_delta(self.sweep_grace)
    }
}

fn to_delta(d: Duration) -> chrono::Duration {
    chrono::Duration::milliseconds(d.as_millis().min(i64::MAX as u128) as i64)
}
