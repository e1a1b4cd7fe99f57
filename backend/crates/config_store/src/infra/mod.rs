//! Infrastructure Layer
//!
//! Database implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryConfigRepository;
pub use postgres::PgConfigRepository;
