//! # volders-entity
//!
//! Entity models for Volders. `Folder` and `File` each embed the shared
//! [`Common`] fields and map one-to-one onto a database table row, so they
//! derive `sqlx::FromRow` in addition to the serde traits.

pub mod common;
pub mod file;
pub mod folder;

pub use common::Common;
pub use file::File;
pub use folder::Folder;
