//! Config Store Error Types
//!
//! Store-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Config store result type alias
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Config store error variants
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key is empty, too long or contains unsupported characters
    #[error("Invalid configuration key: {0}")]
    InvalidKey(String),

    /// Value cannot be represented (e.g. JSON null) or has the wrong shape
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// No active entry for the key
    #[error("Configuration key not found: {0}")]
    NotFound(String),

    /// Write request without an acting user
    #[error("Acting user is required")]
    MissingActor,

    /// Acting user header present but not a user id
    #[error("Invalid acting user: {0}")]
    InvalidActor(String),

    /// Underlying store unavailable or write failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConfigError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::InvalidKey(_)
            | ConfigError::InvalidValue(_)
            | ConfigError::InvalidActor(_) => ErrorKind::BadRequest,
            ConfigError::NotFound(_) => ErrorKind::NotFound,
            ConfigError::MissingActor => ErrorKind::Unauthorized,
            ConfigError::Persistence(_) => ErrorKind::ServiceUnavailable,
            ConfigError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Storage details stay in the logs; the client only sees a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ConfigError::Persistence(_) => {
                AppError::new(self.kind(), "Configuration storage is unavailable")
                    .with_action("Retry the change; it was not saved")
            }
            ConfigError::Internal(_) => AppError::internal("Internal error"),
            ConfigError::MissingActor => AppError::new(self.kind(), self.to_string())
                .with_action("Send the acting user id in the X-Actor-Id header"),
            ConfigError::InvalidActor(_) => AppError::new(self.kind(), self.to_string())
                .with_action("Send the acting user id as a UUID in the X-Actor-Id header"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ConfigError::Persistence(e) => {
                tracing::error!(error = %e, "Config store persistence error");
            }
            ConfigError::Internal(msg) => {
                tracing::error!(message = %msg, "Config store internal error");
            }
            ConfigError::MissingActor => {
                tracing::warn!("Config write without acting user");
            }
            _ => {
                tracing::debug!(error = %self, "Config store error");
            }
        }
    }
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<kernel::id::IdParseError> for ConfigError {
    fn from(e: kernel::id::IdParseError) -> Self {
        ConfigError::InvalidActor(e.to_string())
    }
}
