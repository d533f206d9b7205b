//! HTTP client for the Desert Nomad login endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use nomad_core::config::RemoteConfig;
use nomad_core::error::{AppError, ErrorKind};
use nomad_core::result::AppResult;
use nomad_core::traits::RemoteVerifier;
use nomad_core::types::VerificationResult;

/// Upper bound on a verification response body. The contract is a single
/// `{"Result": bool}` object.
const MAX_RESPONSE_BYTES: usize = 4 * 1024;

#[derive(Serialize)]
struct VerificationRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Verifies credentials by POSTing them to the game's auth server.
///
/// Each call builds its own client so the cookie jar lives exactly as long
/// as one verification (including any redirects the server issues while
/// setting up its session). Dropping the returned future aborts the request.
#[derive(Debug, Clone)]
pub struct DesertNomadClient {
    endpoint: Url,
    timeout: Duration,
    connect_timeout: Duration,
    https_only: bool,
    user_agent: String,
}

impl DesertNomadClient {
    /// Creates a client from configuration, rejecting unusable endpoints.
    ///
    /// The scheme is compared after URL parsing, so `HTTPS://` is accepted.
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        config.validate()?;

        let endpoint = Url::parse(config.endpoint.trim()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid remote.endpoint '{}'", config.endpoint),
                e,
            )
        })?;

        match endpoint.scheme() {
            "https" => {}
            "http" if config.allow_insecure_http => {}
            scheme => {
                return Err(AppError::configuration(format!(
                    "remote.endpoint scheme '{scheme}' is not allowed"
                )));
            }
        }

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(config.timeout_seconds),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
            https_only: !config.allow_insecure_http,
            user_agent: config.user_agent.clone(),
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_client(&self) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .https_only(self.https_only)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::RemoteUnavailable,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })
    }
}

#[async_trait]
impl RemoteVerifier for DesertNomadClient {
    fn name(&self) -> &str {
        "desert-nomad"
    }

    async fn verify(&self, username: &str, password: &str) -> AppResult<VerificationResult> {
        let client = self.build_client()?;

        let response = client
            .post(self.endpoint.clone())
            .json(&VerificationRequest { username, password })
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "Desert Nomad request timed out".to_string()
                } else {
                    format!("Desert Nomad request failed: {e}")
                };
                AppError::with_source(ErrorKind::RemoteUnavailable, message, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote_unavailable(format!(
                "Desert Nomad returned HTTP {status}"
            )));
        }

        let body = read_capped(response).await?;

        let result: VerificationResult = serde_json::from_slice(&body).map_err(|e| {
            warn!(
                username = %username,
                body_len = body.len(),
                error = %e,
                "Desert Nomad response does not match the Result contract"
            );
            AppError::with_source(
                ErrorKind::RemoteProtocol,
                format!("Malformed Desert Nomad response: {e}"),
                e,
            )
        })?;

        debug!(username = %username, success = result.success, "Desert Nomad answered");
        Ok(result)
    }
}

/// Reads the body chunk by chunk, failing once it grows past
/// [`MAX_RESPONSE_BYTES`].
async fn read_capped(mut response: reqwest::Response) -> AppResult<Vec<u8>> {
    let too_large = || {
        AppError::remote_protocol(format!(
            "Desert Nomad response exceeds {MAX_RESPONSE_BYTES} bytes"
        ))
    };

    if response
        .content_length()
        .is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    loop {
        let chunk = response.chunk().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::RemoteUnavailable,
                format!("Failed to read Desert Nomad response: {e}"),
                e,
            )
        })?;
        let Some(chunk) = chunk else {
            break;
        };
        if body.len() + chunk.len() > MAX_RESPONSE_BYTES {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
