//! Remote verification service configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for the Desert Nomad verification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Full URL the credentials are POSTed to. Required.
    #[serde(default)]
    pub endpoint: String,
    /// Total request timeout in seconds. Must be nonzero.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// TCP/TLS connect timeout in seconds. Must be nonzero.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Permit a plain `http://` endpoint. Only for local development and tests.
    #[serde(default)]
    pub allow_insecure_http: bool,
    /// User-Agent header sent with every verification request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            allow_insecure_http: false,
            user_agent: default_user_agent(),
        }
    }
}

impl RemoteConfig {
    /// Check the presence and timeout settings.
    ///
    /// URL syntax and scheme are checked where the endpoint is parsed, by the
    /// client that uses it.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.endpoint.trim().is_empty() {
            return Err(AppError::configuration(
                "remote.endpoint is required for the Desert Nomad bridge",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(AppError::configuration(
                "remote.timeout_seconds must be greater than zero",
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "remote.connect_timeout_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("nomad-bridge/{}", env!("CARGO_PKG_VERSION"))
}
