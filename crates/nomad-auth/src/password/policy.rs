//! Password validity checks run at login, before any lookup or remote call.

use nomad_core::config::PasswordPolicyConfig;
use nomad_core::error::AppError;

/// Validates a submitted password against the configured login policy.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    config: PasswordPolicyConfig,
}

impl PasswordPolicy {
    /// Creates a new policy from configuration.
    pub fn new(config: &PasswordPolicyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Checks the password for `username` against every rule.
    ///
    /// Returns a validation error carrying a user-facing reason for the
    /// first violation found.
    pub fn check(&self, username: &str, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.config.min_length {
            return Err(AppError::validation(format!(
                "Passwords must be at least {} characters.",
                self.config.min_length
            )));
        }

        if password.len() > self.config.max_length {
            return Err(AppError::validation(format!(
                "Passwords must be no longer than {} bytes.",
                self.config.max_length
            )));
        }

        if self.config.reject_username_match && password.to_lowercase() == username.to_lowercase()
        {
            return Err(AppError::validation(
                "Your password must be different from your username.",
            ));
        }

        if let Some(min_score) = self.config.min_strength_score {
            let estimate = zxcvbn::zxcvbn(password, &[username]);
            if score_value(estimate.score()) < min_score {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password.",
                ));
            }
        }

        Ok(())
    }
}

fn score_value(score: zxcvbn::Score) -> u8 {
    match score {
        zxcvbn::Score::Zero => 0,
        zxcvbn::Score::One => 1,
        zxcvbn::Score::Two => 2,
        zxcvbn::Score::Three => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomad_core::error::ErrorKind;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::new(&PasswordPolicyConfig::default())
    }

    #[test]
    fn test_default_policy_accepts_short_password() {
        assert!(policy().check("Newplayer", "hunter2").is_ok());
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = policy().check("Newplayer", "").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_username_match_rejected() {
        let err = policy().check("Newplayer", "newplayer").unwrap_err();
        assert!(err.message.contains("different from your username"));

        let relaxed = PasswordPolicy::new(&PasswordPolicyConfig {
            reject_username_match: false,
            ..PasswordPolicyConfig::default()
        });
        assert!(relaxed.check("Newplayer", "newplayer").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let bounded = PasswordPolicy::new(&PasswordPolicyConfig {
            min_length: 4,
            max_length: 8,
            ..PasswordPolicyConfig::default()
        });
        assert!(bounded.check("Newplayer", "abc").is_err());
        assert!(bounded.check("Newplayer", "abcd").is_ok());
        assert!(bounded.check("Newplayer", "abcdefghi").is_err());
    }

    #[test]
    fn test_strength_score() {
        let strict = PasswordPolicy::new(&PasswordPolicyConfig {
            min_strength_score: Some(3),
            ..PasswordPolicyConfig::default()
        });
        assert!(strict.check("Newplayer", "password").is_err());
        assert!(strict.check("Newplayer", "correct-horse-battery-staple-42!").is_ok());
    }
}
