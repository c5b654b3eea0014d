//! # volders
//!
//! Wires the Volders backends together: configuration-driven backend
//! selection behind the repository trait, and logging setup for the
//! `volders` binary.

pub mod logging;
pub mod provider;

pub use provider::RepositoryManager;
