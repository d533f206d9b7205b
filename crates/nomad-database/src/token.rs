//! Session token generation.

use uuid::Uuid;

/// Generate a fresh 32-character hex session token.
pub(crate) fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}
