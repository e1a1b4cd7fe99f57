//! Presentation Layer
//!
//! HTTP handlers, DTOs and router for the admin settings API.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ConfigAppState;
pub use router::{config_router, config_router_generic};
