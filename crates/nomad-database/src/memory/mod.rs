//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use nomad_core::error::AppError;
use nomad_core::result::AppResult;
use nomad_core::traits::CredentialStore;
use nomad_core::types::{AccountId, CreateAccount, INVALID_PASSWORD_HASH, LocalAccount};

use crate::token::new_session_token;

#[derive(Debug, Default)]
struct State {
    next_id: AccountId,
    accounts: HashMap<AccountId, LocalAccount>,
    by_username: HashMap<String, AccountId>,
}

impl State {
    fn insert(&mut self, username: &str, password_hash: &str) -> LocalAccount {
        self.next_id += 1;
        let now = Utc::now();
        let account = LocalAccount {
            id: self.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            password_expires: None,
            token: new_session_token(),
            created_at: now,
            updated_at: now,
        };
        self.by_username.insert(account.username.clone(), account.id);
        self.accounts.insert(account.id, account.clone());
        account
    }
}

/// Credential store held entirely in process memory.
///
/// All mutations take a single write lock, so compare-and-swap and
/// create-if-absent are atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: RwLock<State>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account with a known hash, replacing nothing.
    ///
    /// Returns the existing account unchanged if the username is taken.
    pub async fn seed(&self, username: &str, password_hash: &str) -> LocalAccount {
        let mut state = self.state.write().await;
        if let Some(id) = state.by_username.get(username).copied() {
            if let Some(existing) = state.accounts.get(&id) {
                return existing.clone();
            }
        }
        state.insert(username, password_hash)
    }

    /// Set or clear the password expiry of an account.
    pub async fn set_password_expiry(
        &self,
        id: AccountId,
        expires: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::local_store(format!("Account {id} not found")))?;
        account.password_expires = expires;
        account.updated_at = Utc::now();
        Ok(())
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    /// Whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<LocalAccount>> {
        let state = self.state.read().await;
        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn create_account(&self, account: &CreateAccount) -> AppResult<LocalAccount> {
        Ok(self.seed(&account.username, INVALID_PASSWORD_HASH).await)
    }

    async fn update_password_hash(
        &self,
        id: AccountId,
        expected: &str,
        new_hash: &str,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.accounts.get_mut(&id) {
            Some(account) if account.password_hash == expected => {
                account.password_hash = new_hash.to_string();
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn rotate_session_token(&self, id: AccountId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::local_store(format!("Account {id} not found")))?;
        account.token = new_session_token();
        account.updated_at = Utc::now();
        Ok(())
    }
}
