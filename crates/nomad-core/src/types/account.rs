//! Local account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned account identifier.
pub type AccountId = i64;

/// Password hash written to freshly created accounts.
///
/// It is not a valid PHC string, so no password ever verifies against it.
/// An account that is created but never synced stays locked out instead of
/// accepting an empty password.
pub const INVALID_PASSWORD_HASH: &str = "!";

/// A local account as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAccount {
    /// Unique account identifier, assigned by the store.
    pub id: AccountId,
    /// Canonical login name.
    pub username: String,
    /// Opaque password hash (Argon2 PHC string or [`INVALID_PASSWORD_HASH`]).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the password stops being accepted without a change.
    pub password_expires: Option<DateTime<Utc>>,
    /// Session token; rotated whenever the password hash is replaced.
    #[serde(skip_serializing)]
    pub token: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl LocalAccount {
    /// Whether the stored hash could ever match a password.
    pub fn has_usable_password(&self) -> bool {
        !self.password_hash.is_empty() && self.password_hash != INVALID_PASSWORD_HASH
    }

    /// Whether the password has passed its expiry time.
    pub fn is_password_expired(&self, now: DateTime<Utc>) -> bool {
        self.password_expires.is_some_and(|expires| expires <= now)
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Canonical login name.
    pub username: String,
}

impl CreateAccount {
    /// Create request for the given canonical username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
