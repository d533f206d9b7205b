//! Account and credential types shared by the store, the verifier and the
//! bridge.

pub mod account;
pub mod credential;
pub mod verification;

pub use account::{AccountId, CreateAccount, INVALID_PASSWORD_HASH, LocalAccount};
pub use credential::CredentialAttempt;
pub use verification::VerificationResult;
