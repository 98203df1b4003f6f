//! kubessh error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorised failure kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum KubeSshErrorKind {
    /// `host[:port]` string has a malformed port segment or no host.
    InvalidEndpoint,
    /// No credential with the requested id is visible to the owner.
    CredentialNotFound,
    /// TCP connect or SSH handshake failed.
    ConnectionFailed,
    /// Server rejected every authentication attempt.
    AuthFailed,
    /// Remote file could not be copied completely.
    TransferFailed,
    /// Settings or credential file is invalid or unreadable.
    InvalidConfig,
    /// Local filesystem error.
    Io,
    /// Cluster client could not be built from the fetched file.
    ClientFailed,
}

/// Crate error carrying a kind, a human-readable message and, when known,
/// the endpoint the operation was talking to.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{kind:?}] {message}")]
pub struct KubeSshError {
    pub kind: KubeSshErrorKind,
    pub message: String,
    pub endpoint: Option<String>,
}

pub type KubeSshResult<T> = Result<T, KubeSshError>;

// ── Construction helpers ─────────────────────────────────────────────

impl KubeSshError {
    pub fn new(kind: KubeSshErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::InvalidEndpoint, msg)
    }

    pub fn credential_not_found(id: &str) -> Self {
        Self::new(
            KubeSshErrorKind::CredentialNotFound,
            format!("Cannot find SSH credentials with ID {}", id),
        )
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::ConnectionFailed, msg)
    }

    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::AuthFailed, msg)
    }

    pub fn transfer_failed(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::TransferFailed, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::InvalidConfig, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::Io, msg)
    }

    pub fn client_failed(msg: impl Into<String>) -> Self {
        Self::new(KubeSshErrorKind::ClientFailed, msg)
    }

    pub fn is(&self, kind: KubeSshErrorKind) -> bool {
        self.kind == kind
    }
}

impl From<std::io::Error> for KubeSshError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<KubeSshError> for String {
    fn from(e: KubeSshError) -> String {
        e.to_string()
    }
}
