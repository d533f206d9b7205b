//! Local credential store trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{AccountId, CreateAccount, LocalAccount};

/// Persistence the bridge needs from the host's account table.
///
/// Implementations must make [`create_account`](Self::create_account)
/// idempotent per username and
/// [`update_password_hash`](Self::update_password_hash) a single atomic
/// compare-and-swap. The bridge does not serialize concurrent attempts for
/// the same user and relies on these two guarantees instead.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find an account by its canonical username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<LocalAccount>>;

    /// Create an account holding the invalid password sentinel.
    ///
    /// If an account with this username already exists, it is returned
    /// unchanged instead of inserting a duplicate.
    async fn create_account(&self, account: &CreateAccount) -> AppResult<LocalAccount>;

    /// Replace the password hash only if it still equals `expected`.
    ///
    /// Returns `true` if the row was updated, `false` if another writer
    /// changed the hash first or the account no longer exists.
    async fn update_password_hash(
        &self,
        id: AccountId,
        expected: &str,
        new_hash: &str,
    ) -> AppResult<bool>;

    /// Issue a fresh session token for the account, invalidating the old one.
    async fn rotate_session_token(&self, id: AccountId) -> AppResult<()>;
}
