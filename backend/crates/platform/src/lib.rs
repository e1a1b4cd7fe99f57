//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (secure random digits, SHA-256, constant-time comparison)
//! - Clock abstraction so time-dependent rules can be tested

pub mod clock;
pub mod crypto;
