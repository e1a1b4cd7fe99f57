//! Code delivery port

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{CodePurpose, Email, VerificationCode};
use crate::error::TwoFactorResult;

/// Out-of-band channel that hands the code to the user
#[trait_variant::make(CodeMailer: Send)]
pub trait LocalCodeMailer {
    async fn send_code(
        &self,
        email: &Email,
        code: &VerificationCode,
        purpose: CodePurpose,
        expires_at: DateTime<Utc>,
    ) -> TwoFactorResult<()>;
}
