//! Host authentication-provider contract.
//!
//! The host runs a chain of primary providers for every login. Each one
//! passes, fails, or abstains; the first non-abstain answer wins.
//!
//! # Two-phase handoff
//!
//! [`DesertNomadProvider`] never passes. When the remote server confirms a
//! password, it rewrites the local hash and then abstains, leaving the final
//! accept to a [`LocalPasswordProvider`] placed *after* it in the chain. That
//! provider checks the same password against the hash that was just written.
//! One login therefore runs the local check twice: once inside the bridge
//! before sync and once in the local provider after it. This ordering is a
//! contract, and [`AuthenticationChain::validate`] refuses chains that
//! break it.

pub mod chain;
pub mod local;
pub mod nomad;

use async_trait::async_trait;
use serde::Serialize;

use nomad_core::result::AppResult;
use nomad_core::types::CredentialAttempt;

pub use chain::AuthenticationChain;
pub use local::LocalPasswordProvider;
pub use nomad::DesertNomadProvider;

/// Message key returned when no provider accepted the credentials.
pub const WRONG_PASSWORD: &str = "wrongpassword";

/// A provider's answer for one login step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthenticationResponse {
    /// The user is authenticated as `username`.
    Pass {
        /// Canonical account name.
        username: String,
    },
    /// Authentication failed; stop the chain.
    Fail {
        /// User-facing message or message key.
        message: String,
    },
    /// No opinion; ask the next provider.
    Abstain,
}

impl AuthenticationResponse {
    /// Shorthand for a failure response.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
        }
    }
}

/// How a provider takes part in account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCreationType {
    /// The provider cannot create accounts.
    None,
    /// The provider creates accounts from submitted credentials.
    Create,
    /// The provider links existing external identities.
    Link,
}

/// A primary authentication provider in the host's chain.
///
/// Account-creation and credential-change hooks default to "not involved".
#[async_trait]
pub trait PrimaryAuthenticationProvider: Send + Sync + 'static {
    /// Stable identifier used in logs.
    fn id(&self) -> &str;

    /// Handle a username/password login.
    async fn begin_primary_authentication(
        &self,
        attempt: &CredentialAttempt,
    ) -> AuthenticationResponse;

    /// Whether `username` could authenticate through this provider.
    async fn test_user_can_authenticate(&self, username: &str) -> bool;

    /// Whether `username` is known to this provider.
    async fn test_user_exists(&self, username: &str) -> bool;

    /// This provider abstains after reconciling state and needs a local
    /// password check later in the chain to finish the login.
    fn defers_to_local_check(&self) -> bool {
        false
    }

    /// This provider performs the final local password check.
    fn is_local_password_check(&self) -> bool {
        false
    }

    /// Whether a credential change request is acceptable.
    fn provider_allows_authentication_data_change(
        &self,
        _attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        Ok(())
    }

    /// Apply a credential change.
    async fn provider_change_authentication_data(
        &self,
        _attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        Ok(())
    }

    /// How this provider participates in account creation.
    fn account_creation_type(&self) -> AccountCreationType {
        AccountCreationType::None
    }

    /// Pre-flight check before an account is created.
    fn test_for_account_creation(&self, _username: &str) -> AppResult<()> {
        Ok(())
    }

    /// Start account creation for `username`.
    async fn begin_primary_account_creation(
        &self,
        _username: &str,
        _attempt: &CredentialAttempt,
    ) -> AuthenticationResponse {
        AuthenticationResponse::Abstain
    }

    /// Post-creation hook. Returns an optional log subtype.
    async fn finish_account_creation(&self, _username: &str) -> Option<String> {
        None
    }
}
