//! Core type definitions used across the Volders workspace.

pub mod id;

pub use id::*;
