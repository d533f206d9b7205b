//! # nomad-core
//!
//! Core crate for the Desert Nomad auth bridge. Contains the store and
//! verifier traits, configuration schemas, local account types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other bridge crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
