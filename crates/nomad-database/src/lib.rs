//! # nomad-database
//!
//! Credential store implementations for the auth bridge: a PostgreSQL
//! repository backed by sqlx and an in-memory store for embedding and
//! tests. Both implement [`nomad_core::traits::CredentialStore`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

mod token;

pub use connection::open_account_store;
pub use memory::MemoryCredentialStore;
pub use repositories::AccountRepository;
