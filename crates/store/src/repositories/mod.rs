//! Repository layer.
//!
//! Each repository implements [`garage_core::store::CarStore`] and may add
//! listing and deletion on top.

pub mod car_repo;

pub use car_repo::InMemoryCarRepo;
