//! Ordered provider chain.

use std::sync::Arc;

use tracing::{debug, info};

use nomad_core::error::AppError;
use nomad_core::result::AppResult;
use nomad_core::types::CredentialAttempt;

use super::{AuthenticationResponse, PrimaryAuthenticationProvider, WRONG_PASSWORD};

/// Runs primary providers in order until one passes or fails.
#[derive(Clone, Default)]
pub struct AuthenticationChain {
    providers: Vec<Arc<dyn PrimaryAuthenticationProvider>>,
}

impl std::fmt::Debug for AuthenticationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationChain")
            .field("providers", &self.provider_ids())
            .finish()
    }
}

impl AuthenticationChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider.
    pub fn with_provider(mut self, provider: Arc<dyn PrimaryAuthenticationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Identifiers of the providers, in order.
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Checks that every provider deferring to a local check is followed by
    /// one.
    pub fn validate(&self) -> AppResult<()> {
        for (index, provider) in self.providers.iter().enumerate() {
            if !provider.defers_to_local_check() {
                continue;
            }
            let followed = self.providers[index + 1..]
                .iter()
                .any(|later| later.is_local_password_check());
            if !followed {
                return Err(AppError::configuration(format!(
                    "Provider '{}' requires a local password provider after it in the chain",
                    provider.id()
                )));
            }
        }
        Ok(())
    }

    /// Runs the chain for one login.
    ///
    /// If every provider abstains the attempt fails with the generic
    /// wrong-password message.
    pub async fn authenticate(&self, attempt: &CredentialAttempt) -> AuthenticationResponse {
        for provider in &self.providers {
            let response = provider.begin_primary_authentication(attempt).await;
            match &response {
                AuthenticationResponse::Abstain => {
                    debug!(provider = provider.id(), "Provider abstained");
                }
                AuthenticationResponse::Pass { username } => {
                    info!(provider = provider.id(), username = %username, "Login accepted");
                    return response;
                }
                AuthenticationResponse::Fail { .. } => {
                    info!(provider = provider.id(), username = %attempt.username, "Login failed");
                    return response;
                }
            }
        }
        info!(username = %attempt.username, "All providers abstained");
        AuthenticationResponse::fail(WRONG_PASSWORD)
    }
}
