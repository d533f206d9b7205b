//! Remote verification service trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::VerificationResult;

/// A service that can confirm a username/password pair.
///
/// Errors are reported as [`ErrorKind::RemoteUnavailable`] or
/// [`ErrorKind::RemoteProtocol`]; callers must treat any error as a failed
/// verification.
///
/// [`ErrorKind::RemoteUnavailable`]: crate::error::ErrorKind::RemoteUnavailable
/// [`ErrorKind::RemoteProtocol`]: crate::error::ErrorKind::RemoteProtocol
#[async_trait]
pub trait RemoteVerifier: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Ask the remote service whether the credentials are valid.
    async fn verify(&self, username: &str, password: &str) -> AppResult<VerificationResult>;
}
