//! Transient credential attempt.

use std::fmt;

/// A username/password pair submitted for one authentication call.
///
/// Never persisted. `Debug` redacts the password so the attempt can be put
/// in a tracing span without leaking it.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialAttempt {
    /// Username as typed by the user (not yet canonicalized).
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl CredentialAttempt {
    /// Create an attempt from raw form input.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for CredentialAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialAttempt")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
