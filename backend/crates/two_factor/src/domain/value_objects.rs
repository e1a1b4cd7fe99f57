//! Value Objects
//!
//! Email, CodePurpose and VerificationCode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TwoFactorError, TwoFactorResult};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

/// Normalised email address (trimmed, lowercased)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl AsRef<str>) -> TwoFactorResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(TwoFactorError::InvalidEmail("email cannot be empty".into()));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(TwoFactorError::InvalidEmail(format!(
                "email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(TwoFactorError::InvalidEmail("invalid email format".into()));
        }

        Ok(Self(email))
    }

    /// Basic shape check: one `@`, non-empty local part, dotted domain
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short digest for log correlation; the address itself is never logged
    pub fn log_tag(&self) -> String {
        platform::crypto::log_digest(self.0.as_bytes())
    }
}

impl FromStr for Email {
    type Err = TwoFactorError;

    fn from_str(s: &str) -> TwoFactorResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a code authorises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    #[default]
    Login,
    Register,
    PasswordReset,
}

impl CodePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::Login => "login",
            CodePurpose::Register => "register",
            CodePurpose::PasswordReset => "password_reset",
        }
    }
}

impl FromStr for CodePurpose {
    type Err = TwoFactorError;

    fn from_str(s: &str) -> TwoFactorResult<Self> {
        match s {
            "login" => Ok(CodePurpose::Login),
            "register" => Ok(CodePurpose::Register),
            "password_reset" => Ok(CodePurpose::PasswordReset),
            other => Err(TwoFactorError::Internal(format!(
                "unknown code purpose: {other}"
            ))),
        }
    }
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Six-digit numeric code
///
/// `Debug` is redacted so the code cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Build from a number in `100000..=999999`
    pub fn from_number(n: u32) -> TwoFactorResult<Self> {
        let code = n.to_string();
        if code.len() != CODE_LENGTH {
            return Err(TwoFactorError::Internal(format!(
                "verification code out of range: {n}"
            )));
        }
        Ok(Self(code))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison with user input, no trimming or normalisation
    pub fn matches(&self, input: &str) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), input.as_bytes())
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}
