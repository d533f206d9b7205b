//! # nomad-auth
//!
//! Password bridge between a wiki's local accounts and the Desert Nomad
//! game login server.
//!
//! ## Modules
//!
//! - `bridge`: the local-then-remote decision flow and account sync
//! - `remote`: HTTPS client for the Desert Nomad login endpoint
//! - `password`: Argon2id hashing and login-time policy checks
//! - `username`: canonical account names
//! - `provider`: the host's provider contract, chain, and the two-phase handoff

pub mod bridge;
pub mod password;
pub mod provider;
pub mod remote;
pub mod username;

pub use bridge::{AuthBridge, Decision, Rejection};
pub use password::{PasswordHasher, PasswordPolicy};
pub use provider::{
    AuthenticationChain, AuthenticationResponse, DesertNomadProvider, LocalPasswordProvider,
    PrimaryAuthenticationProvider,
};
pub use remote::DesertNomadClient;
pub use username::UsernameCanonicalizer;
