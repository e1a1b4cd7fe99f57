//! Two-Factor Verification Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - TwoFactorCode entity, value objects, repository and mailer traits
//! - `application/` - Issue, send, verify and login-gate use cases, expiry sweep
//! - `infra/` - PostgreSQL and in-memory repositories, mailers
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Codes are 6 digits from the OS RNG, valid for 10 minutes, 3 attempts each
//! - Issuing a code invalidates the outstanding ones for the same email
//! - An attempt is stored before the code is compared
//! - State changes are conditional updates, so concurrent verifications of
//!   one code cannot both succeed
//! - Expiry is decided by timestamp comparison; the sweep only reclaims storage
//! - Codes never appear in logs and emails only as a digest

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{InvalidationScope, TwoFactorConfig};
pub use application::login_gate::{LoginChallenge, LoginGateUseCase};
pub use application::sweeper::{purge_expired_codes, spawn_expiry_sweeper};
pub use domain::entities::TwoFactorCode;
pub use domain::services::generate_code;
pub use domain::value_objects::{CodePurpose, Email, VerificationCode};
pub use error::{TwoFactorError, TwoFactorResult};
pub use infra::{InMemoryTwoFactorRepository, PgTwoFactorRepository, RecordingMailer, TracingMailer};
pub use presentation::router::{two_factor_router, two_factor_router_generic};
