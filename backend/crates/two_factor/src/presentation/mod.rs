//! Presentation Layer - HTTP handlers and routing

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::TwoFactorAppState;
pub use router::{two_factor_router, two_factor_router_generic};
