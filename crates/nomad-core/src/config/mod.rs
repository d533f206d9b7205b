//! Bridge configuration schemas.
//!
//! Configuration is deserialized from TOML files via the `config` crate,
//! overlaid with `NOMAD__`-prefixed environment variables. Each sub-module
//! is one logical section.

pub mod database;
pub mod logging;
pub mod policy;
pub mod remote;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::policy::PasswordPolicyConfig;
pub use self::remote::RemoteConfig;

use crate::error::AppError;

/// Root bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Remote verification service settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Login-time password policy.
    #[serde(default)]
    pub policy: PasswordPolicyConfig,
    /// PostgreSQL account store. When absent the in-memory store is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load configuration from `config/default`, `config/{env}` and the
    /// environment, then validate it.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(Path::new("config"), env)
    }

    /// Load configuration from `default` and `{env}` files in `dir`.
    ///
    /// Both files are optional. Environment variables of the form
    /// `NOMAD__REMOTE__ENDPOINT` override file values.
    pub fn load_from(dir: &Path, env: &str) -> Result<Self, AppError> {
        let default_path = dir.join("default");
        let env_path = dir.join(env);
        debug!(dir = %dir.display(), env, "Loading bridge configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_path.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("NOMAD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Check the settings that must hold before the bridge can serve a
    /// single request.
    ///
    /// The endpoint's scheme is enforced by `DesertNomadClient::new`, which
    /// runs on the same startup path.
    pub fn validate(&self) -> Result<(), AppError> {
        self.remote.validate()?;

        if self.policy.min_length > self.policy.max_length {
            return Err(AppError::configuration(format!(
                "policy.min_length ({}) exceeds policy.max_length ({})",
                self.policy.min_length, self.policy.max_length
            )));
        }

        if let Some(score) = self.policy.min_strength_score {
            if score > 4 {
                return Err(AppError::configuration(format!(
                    "policy.min_strength_score must be between 0 and 4, got {score}"
                )));
            }
        }

        if let Some(db) = &self.database {
            if db.url.trim().is_empty() {
                return Err(AppError::configuration("database.url must not be empty"));
            }
        }

        Ok(())
    }
}
