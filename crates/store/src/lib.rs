//! Reference storage for car records.
//!
//! Provides an in-process implementation of [`garage_core::store::CarStore`]
//! with BIGSERIAL-style id assignment.

pub mod repositories;

pub use repositories::InMemoryCarRepo;
