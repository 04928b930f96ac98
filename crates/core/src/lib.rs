//! Car record validation and JSON codec.
//!
//! Pure logic with no storage or transport dependencies. Persistence is
//! reached through the [`store::CarStore`] trait, implemented elsewhere.

pub mod car;
pub mod codec;
pub mod error;
pub mod policy;
pub mod presence;
pub mod store;
pub mod types;
pub mod validation;
