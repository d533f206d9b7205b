//! Chain adapter for the Desert Nomad bridge.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use nomad_core::result::AppResult;
use nomad_core::types::CredentialAttempt;

use crate::bridge::{AuthBridge, Decision};

use super::{AccountCreationType, AuthenticationResponse, PrimaryAuthenticationProvider};

/// Runs the bridge for each login and always hands the final decision to
/// the local password provider.
///
/// Only a password policy violation ends the chain here, as `Fail` with
/// the policy message. Every other decision, including remote rejection,
/// becomes `Abstain`; the local provider then fails or passes the attempt
/// on its own, so the response never reveals whether the account exists
/// remotely.
#[derive(Debug, Clone)]
pub struct DesertNomadProvider {
    bridge: Arc<AuthBridge>,
}

impl DesertNomadProvider {
    /// Wraps a bridge.
    pub fn new(bridge: Arc<AuthBridge>) -> Self {
        Self { bridge }
    }

    /// Translate a bridge decision into a chain response.
    pub fn response_for(decision: &Decision) -> AuthenticationResponse {
        match decision.user_reason() {
            Some(reason) => AuthenticationResponse::fail(reason),
            None => AuthenticationResponse::Abstain,
        }
    }
}

#[async_trait]
impl PrimaryAuthenticationProvider for DesertNomadProvider {
    fn id(&self) -> &str {
        "desert-nomad"
    }

    async fn begin_primary_authentication(
        &self,
        attempt: &CredentialAttempt,
    ) -> AuthenticationResponse {
        let decision = self
            .bridge
            .authenticate(&attempt.username, &attempt.password)
            .await;
        debug!(decision = %decision, "Bridge decision, handing off to local check");
        Self::response_for(&decision)
    }

    // Any name may exist remotely; the bridge decides at login time.
    async fn test_user_can_authenticate(&self, _username: &str) -> bool {
        true
    }

    async fn test_user_exists(&self, _username: &str) -> bool {
        true
    }

    fn defers_to_local_check(&self) -> bool {
        true
    }

    // Credential changes belong to the local provider; accept and ignore.
    fn provider_allows_authentication_data_change(
        &self,
        _attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn provider_change_authentication_data(
        &self,
        _attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        Ok(())
    }

    fn account_creation_type(&self) -> AccountCreationType {
        AccountCreationType::Create
    }

    fn test_for_account_creation(&self, _username: &str) -> AppResult<()> {
        Ok(())
    }

    async fn begin_primary_account_creation(
        &self,
        _username: &str,
        _attempt: &CredentialAttempt,
    ) -> AuthenticationResponse {
        AuthenticationResponse::Abstain
    }

    async fn finish_account_creation(&self, _username: &str) -> Option<String> {
        None
    }
}
