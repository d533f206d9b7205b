//! The local-then-remote password bridge.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use nomad_core::config::BridgeConfig;
use nomad_core::error::{AppError, ErrorKind};
use nomad_core::result::AppResult;
use nomad_core::traits::{CredentialStore, RemoteVerifier};
use nomad_core::types::{AccountId, CreateAccount, LocalAccount};

use crate::password::{PasswordHasher, PasswordPolicy};
use crate::remote::DesertNomadClient;
use crate::username::UsernameCanonicalizer;

use super::decision::{AbstainReason, Decision, Rejection};

/// Checks credentials locally and falls back to the Desert Nomad server,
/// repairing or provisioning the local account when the server agrees.
///
/// The bridge only reconciles state. It never tells the host that a user is
/// logged in; see [`DesertNomadProvider`](crate::provider::DesertNomadProvider)
/// for how its decisions reach the authentication chain.
#[derive(Clone)]
pub struct AuthBridge {
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn RemoteVerifier>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    canonicalizer: UsernameCanonicalizer,
}

impl std::fmt::Debug for AuthBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBridge")
            .field("verifier", &self.verifier.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl AuthBridge {
    /// Creates a bridge over an explicit store and verifier.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn RemoteVerifier>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            store,
            verifier,
            hasher: PasswordHasher::new(),
            policy,
            canonicalizer: UsernameCanonicalizer::new(),
        }
    }

    /// Creates a bridge talking to the configured Desert Nomad endpoint.
    ///
    /// Fails with a configuration error if the endpoint is missing or
    /// unusable; that is a startup problem, never a per-request one.
    pub fn from_config(config: &BridgeConfig, store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        config.validate()?;
        let client = DesertNomadClient::new(&config.remote)?;
        info!(endpoint = %client.endpoint(), "Desert Nomad bridge configured");
        Ok(Self::new(
            store,
            Arc::new(client),
            PasswordPolicy::new(&config.policy),
        ))
    }

    /// Runs one authentication attempt.
    ///
    /// 1. Abstain on empty input or an unusable username
    /// 2. Reject on a password policy violation, without any lookup
    /// 3. Accept locally if the stored hash matches
    /// 4. Otherwise ask the remote service exactly once
    /// 5. On remote success create or repair the account and rotate its token
    ///
    /// No error escapes; store and remote failures become rejections.
    pub async fn authenticate(&self, username: &str, password: &str) -> Decision {
        if username.is_empty() || password.is_empty() {
            debug!("Missing username or password, abstaining");
            return Decision::Abstain(AbstainReason::MissingCredentials);
        }

        let canonical = match self.canonicalizer.canonicalize(username) {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, "Username not usable, abstaining");
                return Decision::Abstain(AbstainReason::InvalidUsername);
            }
        };

        if let Err(e) = self.policy.check(&canonical, password) {
            info!(username = %canonical, outcome = "reject_policy", "Password policy violation");
            return Decision::Reject(Rejection::PolicyViolation(e.message));
        }

        let existing = match self.store.find_by_username(&canonical).await {
            Ok(account) => account,
            Err(e) => {
                error!(username = %canonical, error = %e, "Account lookup failed");
                return Decision::Reject(Rejection::LocalStore);
            }
        };

        if let Some(account) = &existing {
            if self.matches_local(account, password) {
                if account.is_password_expired(Utc::now()) {
                    info!(username = %canonical, account_id = account.id, "Local password matched but has expired");
                }
                debug!(username = %canonical, outcome = "accept_local", "Local password matched");
                return Decision::AcceptLocal;
            }
        }

        match self.verifier.verify(&canonical, password).await {
            Ok(result) if result.success => {
                info!(
                    username = %canonical,
                    verifier = self.verifier.name(),
                    outcome = "remote_success",
                    "Remote login succeeded"
                );
            }
            Ok(_) => {
                info!(
                    username = %canonical,
                    verifier = self.verifier.name(),
                    outcome = "reject_remote_denied",
                    "Remote login failed"
                );
                return Decision::Reject(Rejection::RemoteDenied);
            }
            Err(e) => {
                let rejection = Rejection::from_remote_error(&e);
                if e.kind == ErrorKind::RemoteProtocol {
                    warn!(username = %canonical, error = %e, outcome = "reject_remote_protocol", "Remote returned a malformed answer");
                } else {
                    warn!(username = %canonical, error = %e, outcome = "reject_remote_unavailable", "Remote verification unavailable");
                }
                return Decision::Reject(rejection);
            }
        }

        match self.sync_account(&canonical, password, existing).await {
            Ok(account_id) => {
                info!(username = %canonical, account_id, outcome = "accept_remote_and_sync", "Local account synchronized");
                Decision::AcceptRemoteAndSync
            }
            Err(e) => {
                error!(username = %canonical, error = %e, outcome = "reject_local_store", "Failed to synchronize local account");
                Decision::Reject(Rejection::LocalStore)
            }
        }
    }

    fn matches_local(&self, account: &LocalAccount, password: &str) -> bool {
        if !account.has_usable_password() {
            return false;
        }
        match self.hasher.verify_password(password, &account.password_hash) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(account_id = account.id, error = %e, "Local hash check failed, deferring to remote");
                false
            }
        }
    }

    /// Makes the stored hash match `password`, creating the account first if
    /// needed.
    ///
    /// New accounts start with the invalid-password sentinel, so a failure
    /// between create and hash write leaves a locked account.
    async fn sync_account(
        &self,
        username: &str,
        password: &str,
        existing: Option<LocalAccount>,
    ) -> AppResult<AccountId> {
        let account = match existing {
            Some(account) => account,
            None => {
                let created = self
                    .store
                    .create_account(&CreateAccount::new(username))
                    .await?;
                info!(username = %username, account_id = created.id, "Provisioned local account from remote login");
                created
            }
        };

        let new_hash = self.hasher.hash_password(password)?;
        let swapped = self
            .store
            .update_password_hash(account.id, &account.password_hash, &new_hash)
            .await?;

        if !swapped {
            // Another writer changed the hash since it was read.
            let current = self
                .store
                .find_by_username(username)
                .await?
                .ok_or_else(|| {
                    AppError::local_store(format!("Account '{username}' vanished during sync"))
                })?;

            if self.matches_local(&current, password) {
                debug!(account_id = current.id, "Concurrent sync already stored a matching hash");
                return Ok(current.id);
            }
            return Err(AppError::local_store(format!(
                "Password hash for account {} changed concurrently",
                current.id
            )));
        }

        self.store.rotate_session_token(account.id).await?;
        Ok(account.id)
    }
}
