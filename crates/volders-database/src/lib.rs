//! # volders-database
//!
//! PostgreSQL connection management and the persistent implementation of
//! [`VolderRepository`](volders_core::traits::VolderRepository).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::PgVolderRepository;
