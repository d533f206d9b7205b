//! Core traits defined in `nomad-core` and implemented by other crates.

pub mod credential_store;
pub mod remote_verifier;

pub use credential_store::CredentialStore;
pub use remote_verifier::RemoteVerifier;
