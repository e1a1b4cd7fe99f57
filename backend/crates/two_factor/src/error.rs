//! Two-Factor Error Types
//!
//! Verification-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Two-factor result type alias
pub type TwoFactorResult<T> = Result<T, TwoFactorError>;

/// Two-factor error variants
#[derive(Debug, Error)]
pub enum TwoFactorError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No code was ever issued for the email and purpose, or it was swept
    #[error("Verification code not found")]
    CodeNotFound,

    #[error("Verification code expired")]
    Expired,

    #[error("Verification code already used")]
    AlreadyUsed,

    #[error("Too many verification attempts")]
    AttemptsExceeded,

    #[error("Invalid verification code ({remaining_attempts} attempts remaining)")]
    InvalidCode { remaining_attempts: u8 },

    /// Code was stored but could not be sent
    #[error("Code delivery failed: {0}")]
    Delivery(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TwoFactorError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TwoFactorError::InvalidEmail(_) => ErrorKind::BadRequest,
            TwoFactorError::CodeNotFound => ErrorKind::NotFound,
            TwoFactorError::Expired => ErrorKind::Gone,
            TwoFactorError::AlreadyUsed => ErrorKind::Conflict,
            TwoFactorError::AttemptsExceeded => ErrorKind::TooManyRequests,
            TwoFactorError::InvalidCode { .. } => ErrorKind::Unauthorized,
            TwoFactorError::Delivery(_) => ErrorKind::BadGateway,
            TwoFactorError::Persistence(_) => ErrorKind::ServiceUnavailable,
            TwoFactorError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether the user should be told to request a fresh code
    pub fn requires_new_code(&self) -> bool {
        matches!(
            self,
            TwoFactorError::CodeNotFound
                | TwoFactorError::Expired
                | TwoFactorError::AlreadyUsed
                | TwoFactorError::AttemptsExceeded
                | TwoFactorError::InvalidCode {
                    remaining_attempts: 0
                }
        )
    }

    /// Convert to AppError with a user-facing message
    pub fn to_app_error(&self) -> AppError {
        match self {
            TwoFactorError::InvalidEmail(_) => AppError::new(self.kind(), "Invalid email address")
                .with_action("Check the email address and try again"),
            TwoFactorError::CodeNotFound => {
                AppError::new(self.kind(), "No verification code was found")
                    .with_action("Request a new verification code")
            }
            TwoFactorError::Expired => {
                AppError::new(self.kind(), "The verification code has expired")
                    .with_action("Request a new verification code")
            }
            TwoFactorError::AlreadyUsed => {
                AppError::new(self.kind(), "The verification code has already been used")
                    .with_action("Request a new verification code")
            }
            TwoFactorError::AttemptsExceeded => AppError::new(
                self.kind(),
                "Too many incorrect attempts for this verification code",
            )
            .with_action("Request a new verification code"),
            TwoFactorError::InvalidCode { remaining_attempts } => AppError::new(
                self.kind(),
                format!(
                    "Incorrect verification code, {} attempt(s) remaining",
                    remaining_attempts
                ),
            )
            .with_action(if self.requires_new_code() {
                "Request a new verification code"
            } else {
                "Check the code in your email and try again"
            }),
            TwoFactorError::Delivery(_) => {
                AppError::new(self.kind(), "The verification code could not be sent")
                    .with_action("Try sending the code again")
            }
            TwoFactorError::Persistence(_) => {
                AppError::service_unavailable("Verification service is unavailable")
                    .with_action("Please try again later")
            }
            TwoFactorError::Internal(_) => AppError::internal("Internal error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TwoFactorError::Persistence(e) => {
                tracing::error!(error = %e, "Two-factor persistence error");
            }
            TwoFactorError::Internal(msg) => {
                tracing::error!(message = %msg, "Two-factor internal error");
            }
            TwoFactorError::Delivery(msg) => {
                tracing::error!(message = %msg, "Two-factor code delivery failed");
            }
            TwoFactorError::AttemptsExceeded => {
                tracing::warn!("Two-factor attempts exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Two-factor error");
            }
        }
    }
}

impl IntoResponse for TwoFactorError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

