//! Login-time password policy configuration.

use serde::{Deserialize, Serialize};

/// Password validity checks applied before any store or remote access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Minimum password length in characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Maximum password length in bytes.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Reject passwords equal to the username (case-insensitive).
    #[serde(default = "default_true")]
    pub reject_username_match: bool,
    /// Minimum zxcvbn score (0-4). Disabled when unset.
    #[serde(default)]
    pub min_strength_score: Option<u8>,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            reject_username_match: true,
            min_strength_score: None,
        }
    }
}

fn default_min_length() -> usize {
    1
}

fn default_max_length() -> usize {
    4096
}

fn default_true() -> bool {
    true
}
