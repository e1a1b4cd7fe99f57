//! Infrastructure Layer
//!
//! Database and delivery implementations.

pub mod mailer;
pub mod memory;
pub mod postgres;

pub use mailer::{RecordingMailer, SentCode, TracingMailer};
pub use memory::InMemoryTwoFactorRepository;
pub use postgres::PgTwoFactorRepository;
