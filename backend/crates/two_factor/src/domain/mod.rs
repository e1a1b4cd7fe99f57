//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (TwoFactorCode)
//! - Domain value objects (Email, CodePurpose, VerificationCode)
//! - Domain services (code generation)
//! - Repository and mailer traits (interfaces)

pub mod entities;
pub mod mailer;
pub mod repository;
pub mod services;
pub mod value_objects;
