//! Command-line front end for the car codec.
//!
//! Exposes configuration loading and the command implementations so the
//! binary and integration tests share them.

pub mod commands;
pub mod config;
