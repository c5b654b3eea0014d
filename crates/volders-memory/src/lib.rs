//! # volders-memory
//!
//! Process-local implementation of
//! [`VolderRepository`](volders_core::traits::VolderRepository), used as a
//! test double and for development. Both entity maps live behind a single
//! reader/writer lock: lookups share it, mutations take it exclusively.

pub mod hierarchy;
pub mod store;

pub use store::MemoryVolderRepository;
