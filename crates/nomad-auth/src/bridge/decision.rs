//! Outcome of one bridge authentication attempt.

use std::fmt;

use serde::Serialize;

use nomad_core::error::{AppError, ErrorKind};

/// Why the bridge declined to look at an attempt at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstainReason {
    /// Username or password was empty.
    MissingCredentials,
    /// The username cannot be canonicalized into a usable account name.
    InvalidUsername,
}

/// Why an attempt was rejected.
///
/// Only [`Rejection::PolicyViolation`] carries a message meant for the
/// user; the rest are log distinctions and surface as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Rejection {
    /// The password failed a local validity check.
    PolicyViolation(String),
    /// The remote service answered `{"Result": false}`.
    RemoteDenied,
    /// The remote service was unreachable, timed out or returned non-2xx.
    RemoteUnavailable,
    /// The remote service answered outside the `{"Result": bool}` contract.
    RemoteProtocol,
    /// The local store failed to read, create or update the account.
    LocalStore,
}

impl Rejection {
    /// Map a failed remote call onto a rejection.
    pub fn from_remote_error(err: &AppError) -> Self {
        match err.kind {
            ErrorKind::RemoteProtocol => Self::RemoteProtocol,
            _ => Self::RemoteUnavailable,
        }
    }
}

/// The bridge's verdict on one credential attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    /// The stored hash already matches; nothing was called or written.
    AcceptLocal,
    /// The remote service confirmed the credentials and the local account
    /// was created or repaired to match.
    AcceptRemoteAndSync,
    /// The attempt failed.
    Reject(Rejection),
    /// The bridge has no opinion on this attempt.
    Abstain(AbstainReason),
}

impl Decision {
    /// Whether the credentials are now valid against the local store.
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::AcceptLocal | Self::AcceptRemoteAndSync)
    }

    /// The reason to show the user, present only for policy violations.
    /// Every other failure is reported by the chain's generic message.
    pub fn user_reason(&self) -> Option<&str> {
        match self {
            Self::Reject(Rejection::PolicyViolation(message)) => Some(message),
            _ => None,
        }
    }

    /// Stable label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AcceptLocal => "accept_local",
            Self::AcceptRemoteAndSync => "accept_remote_and_sync",
            Self::Reject(Rejection::PolicyViolation(_)) => "reject_policy",
            Self::Reject(Rejection::RemoteDenied) => "reject_remote_denied",
            Self::Reject(Rejection::RemoteUnavailable) => "reject_remote_unavailable",
            Self::Reject(Rejection::RemoteProtocol) => "reject_remote_protocol",
            Self::Reject(Rejection::LocalStore) => "reject_local_store",
            Self::Abstain(AbstainReason::MissingCredentials) => "abstain_missing_credentials",
            Self::Abstain(AbstainReason::InvalidUsername) => "abstain_invalid_username",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
