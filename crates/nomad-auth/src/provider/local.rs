//! The host's own local password check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use nomad_core::error::AppError;
use nomad_core::result::AppResult;
use nomad_core::traits::CredentialStore;
use nomad_core::types::CredentialAttempt;

use crate::password::{PasswordHasher, PasswordPolicy};
use crate::username::UsernameCanonicalizer;

use super::{AuthenticationResponse, PrimaryAuthenticationProvider, WRONG_PASSWORD};

/// Passes an attempt when the stored hash verifies the password.
///
/// Unknown users abstain and mismatches fail, the way the host's built-in
/// local provider behaves.
#[derive(Clone)]
pub struct LocalPasswordProvider {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    canonicalizer: UsernameCanonicalizer,
}

impl std::fmt::Debug for LocalPasswordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPasswordProvider")
            .field("policy", &self.policy)
            .finish()
    }
}

impl LocalPasswordProvider {
    /// Creates a local provider over the same store the bridge writes to.
    pub fn new(store: Arc<dyn CredentialStore>, policy: PasswordPolicy) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            policy,
            canonicalizer: UsernameCanonicalizer::new(),
        }
    }
}

#[async_trait]
impl PrimaryAuthenticationProvider for LocalPasswordProvider {
    fn id(&self) -> &str {
        "local-password"
    }

    async fn begin_primary_authentication(
        &self,
        attempt: &CredentialAttempt,
    ) -> AuthenticationResponse {
        let Ok(username) = self.canonicalizer.canonicalize(&attempt.username) else {
            return AuthenticationResponse::Abstain;
        };

        let account = match self.store.find_by_username(&username).await {
            Ok(Some(account)) => account,
            Ok(None) => return AuthenticationResponse::Abstain,
            Err(e) => {
                error!(username = %username, error = %e, "Local account lookup failed");
                return AuthenticationResponse::fail(WRONG_PASSWORD);
            }
        };

        match self
            .hasher
            .verify_password(&attempt.password, &account.password_hash)
        {
            Ok(true) => {
                debug!(username = %username, account_id = account.id, "Local password accepted");
                AuthenticationResponse::Pass { username }
            }
            Ok(false) => AuthenticationResponse::fail(WRONG_PASSWORD),
            Err(e) => {
                error!(username = %username, error = %e, "Local password check failed");
                AuthenticationResponse::fail(WRONG_PASSWORD)
            }
        }
    }

    async fn test_user_can_authenticate(&self, username: &str) -> bool {
        match self.canonicalizer.canonicalize(username) {
            Ok(name) => matches!(
                self.store.find_by_username(&name).await,
                Ok(Some(account)) if account.has_usable_password()
            ),
            Err(_) => false,
        }
    }

    async fn test_user_exists(&self, username: &str) -> bool {
        match self.canonicalizer.canonicalize(username) {
            Ok(name) => matches!(self.store.find_by_username(&name).await, Ok(Some(_))),
            Err(_) => false,
        }
    }

    fn is_local_password_check(&self) -> bool {
        true
    }

    fn provider_allows_authentication_data_change(
        &self,
        attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        let username = self.canonicalizer.canonicalize(&attempt.username)?;
        self.policy.check(&username, &attempt.password)
    }

    async fn provider_change_authentication_data(
        &self,
        attempt: &CredentialAttempt,
    ) -> AppResult<()> {
        self.provider_allows_authentication_data_change(attempt)?;
        let username = self.canonicalizer.canonicalize(&attempt.username)?;
        let account = self
            .store
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::validation(format!("No such account '{username}'")))?;

        let new_hash = self.hasher.hash_password(&attempt.password)?;
        if !self
            .store
            .update_password_hash(account.id, &account.password_hash, &new_hash)
            .await?
        {
            return Err(AppError::local_store(format!(
                "Password for account {} changed concurrently",
                account.id
            )));
        }
        self.store.rotate_session_token(account.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomad_core::config::PasswordPolicyConfig;
    use nomad_core::types::INVALID_PASSWORD_HASH;
    use nomad_database::MemoryCredentialStore;

    fn provider(store: Arc<MemoryCredentialStore>) -> LocalPasswordProvider {
        LocalPasswordProvider::new(store, PasswordPolicy::new(&PasswordPolicyConfig::default()))
    }

    #[tokio::test]
    async fn test_pass_fail_abstain() {
        let store = Arc::new(MemoryCredentialStore::new());
        let hash = PasswordHasher::new().hash_password("rightpass").unwrap();
        store.seed("Oldplayer", &hash).await;
        let local = provider(store);

        assert_eq!(
            local
                .begin_primary_authentication(&CredentialAttempt::new("oldplayer", "rightpass"))
                .await,
            AuthenticationResponse::Pass {
                username: "Oldplayer".into()
            }
        );
        assert_eq!(
            local
                .begin_primary_authentication(&CredentialAttempt::new("oldplayer", "wrongpass"))
                .await,
            AuthenticationResponse::fail(WRONG_PASSWORD)
        );
        assert_eq!(
            local
                .begin_primary_authentication(&CredentialAttempt::new("nobody", "x"))
                .await,
            AuthenticationResponse::Abstain
        );
    }

    #[tokio::test]
    async fn test_disabled_account_cannot_authenticate() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.seed("Newplayer", INVALID_PASSWORD_HASH).await;
        let local = provider(store);

        assert!(local.test_user_exists("newplayer").await);
        assert!(!local.test_user_can_authenticate("newplayer").await);
        assert_eq!(
            local
                .begin_primary_authentication(&CredentialAttempt::new("newplayer", ""))
                .await,
            AuthenticationResponse::fail(WRONG_PASSWORD)
        );
    }

    #[tokio::test]
    async fn test_change_authentication_data() {
        let store = Arc::new(MemoryCredentialStore::new());
        let hash = PasswordHasher::new().hash_password("oldpass").unwrap();
        store.seed("Oldplayer", &hash).await;
        let local = provider(store.clone());

        local
            .provider_change_authentication_data(&CredentialAttempt::new("Oldplayer", "newpass"))
            .await
            .unwrap();

        let account = store.find_by_username("Oldplayer").await.unwrap().unwrap();
        assert!(PasswordHasher::new().verify_password("newpass", &account.password_hash).unwrap());

        let err = local
            .provider_change_authentication_data(&CredentialAttempt::new("Oldplayer", "oldplayer"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, nomad_core::error::ErrorKind::Validation);
    }
}
