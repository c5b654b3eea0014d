//! Core traits defined in `volders-core` and implemented by the backend crates.

pub mod repository;

pub use repository::VolderRepository;
