//! Username canonicalization following the host wiki's "usable name" rules.

use std::net::IpAddr;

use nomad_core::error::AppError;

/// Longest accepted canonical name, in bytes.
pub const MAX_USERNAME_BYTES: usize = 255;

const INVALID_CHARACTERS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}', '/', '@', ':'];

const RESERVED_NAMES: &[&str] = &[
    "MediaWiki default",
    "Conversion script",
    "Maintenance script",
    "Template namespace initialisation script",
    "Unknown user",
];

/// Turns raw login input into the canonical account name.
#[derive(Debug, Clone, Default)]
pub struct UsernameCanonicalizer;

impl UsernameCanonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Canonicalize `raw`, or explain why it cannot name an account.
    ///
    /// Underscores become spaces, whitespace runs collapse, and the first
    /// letter is uppercased, so `"new_player"` and `" New  player "` both
    /// become `"New player"`.
    pub fn canonicalize(&self, raw: &str) -> Result<String, AppError> {
        let spaced = raw.replace('_', " ");
        let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(AppError::validation("Username is empty"));
        }

        let mut chars = collapsed.chars();
        let canonical = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => return Err(AppError::validation("Username is empty")),
        };

        if canonical.len() > MAX_USERNAME_BYTES {
            return Err(AppError::validation(format!(
                "Username exceeds {MAX_USERNAME_BYTES} bytes"
            )));
        }

        if let Some(bad) = canonical
            .chars()
            .find(|c| INVALID_CHARACTERS.contains(c) || c.is_control())
        {
            return Err(AppError::validation(format!(
                "Username contains invalid character {bad:?}"
            )));
        }

        if canonical.parse::<IpAddr>().is_ok() {
            return Err(AppError::validation("Username looks like an IP address"));
        }

        if RESERVED_NAMES.contains(&canonical.as_str()) {
            return Err(AppError::validation("Username is reserved"));
        }

        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> Result<String, AppError> {
        UsernameCanonicalizer::new().canonicalize(raw)
    }

    #[test]
    fn test_normalizes_case_and_spacing() {
        assert_eq!(canon("newplayer").unwrap(), "Newplayer");
        assert_eq!(canon("new_player").unwrap(), "New player");
        assert_eq!(canon("  new   player ").unwrap(), "New player");
        assert_eq!(canon("élan").unwrap(), "Élan");
    }

    #[test]
    fn test_keeps_rest_of_name() {
        assert_eq!(canon("oLDPlayer").unwrap(), "OLDPlayer");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(canon("").is_err());
        assert!(canon("   ").is_err());
        assert!(canon("___").is_err());
    }

    #[test]
    fn test_rejects_invalid_characters() {
        for name in ["a#b", "a<b", "a|b", "a/b", "user@host", "Talk:Foo", "a\u{7}b"] {
            assert!(canon(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_rejects_ip_addresses() {
        assert!(canon("192.168.0.1").is_err());
        assert!(canon("192.168.0.1x").is_ok());
    }

    #[test]
    fn test_rejects_reserved_and_long_names() {
        assert!(canon("maintenance_script").is_err());
        assert!(canon(&"a".repeat(MAX_USERNAME_BYTES + 1)).is_err());
        assert!(canon(&"a".repeat(MAX_USERNAME_BYTES)).is_ok());
    }
}
