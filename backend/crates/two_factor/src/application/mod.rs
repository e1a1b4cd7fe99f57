//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod issue_code;
pub mod login_gate;
pub mod send_code;
pub mod sweeper;
pub mod verify_code;
