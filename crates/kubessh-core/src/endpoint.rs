// ── Endpoint – `host[:port]` parsing ─────────────────────────────────────────
//
// Host and port are both taken from a single split at the last colon.
// Bracketed hosts (`[fe80::1]:2222`, `[::1]`) have the brackets removed; a bare
// IPv6 literal must be bracketed to be read as a host.

use crate::constants::DEFAULT_SSH_PORT;
use crate::error::{KubeSshError, KubeSshResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host and port of the SSH server holding the kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a `host[:port]` string. The port defaults to 22.
    pub fn parse(raw: &str) -> KubeSshResult<Self> {
        let trimmed = raw.trim();

        let (host, port) = if let Some(rest) = trimmed.strip_prefix('[') {
            let close = rest.find(']').ok_or_else(|| {
                KubeSshError::invalid_endpoint(format!("Unterminated '[' in SSH server '{}'", raw))
            })?;
            let host = &rest[..close];
            let tail = &rest[close + 1..];
            let port = if tail.is_empty() {
                DEFAULT_SSH_PORT
            } else {
                let segment = tail.strip_prefix(':').ok_or_else(|| {
                    KubeSshError::invalid_endpoint(format!(
                        "Unexpected '{}' after ']' in SSH server '{}'",
                        tail, raw
                    ))
                })?;
                parse_port(segment, raw)?
            };
            (host, port)
        } else {
            match trimmed.rfind(':') {
                Some(idx) => {
                    let host = &trimmed[..idx];
                    if host.ends_with(':') || host.contains("::") {
                        return Err(KubeSshError::invalid_endpoint(format!(
                            "SSH server '{}' looks like a bare IPv6 address; write it as [addr] or [addr]:port",
                            raw
                        )));
                    }
                    (host, parse_port(&trimmed[idx + 1..], raw)?)
                }
                None => (trimmed, DEFAULT_SSH_PORT),
            }
        };

        if host.is_empty() {
            return Err(KubeSshError::invalid_endpoint(format!(
                "SSH server '{}' has no host",
                raw
            )));
        }

        Ok(Self::new(host, port))
    }

    /// `host:port` form used for logging and error context.
    pub fn address(&self) -> String {
        self.to_string()
    }
}

fn parse_port(segment: &str, raw: &str) -> KubeSshResult<u16> {
    let port: u16 = segment.parse().map_err(|e| {
        KubeSshError::invalid_endpoint(format!(
            "Invalid port '{}' in SSH server '{}': {}",
            segment, raw, e
        ))
    })?;
    if port == 0 {
        return Err(KubeSshError::invalid_endpoint(format!(
            "Port 0 is not usable in SSH server '{}'",
            raw
        )));
    }
    Ok(port)
}

impl FromStr for Endpoint {
    type Err = KubeSshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
