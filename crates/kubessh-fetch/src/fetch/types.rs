// ── Types ─────────────────────────────────────────────────────────────────────

use chrono::{DateTime, Utc};
use kubessh_core::constants::{DEFAULT_TIMEOUT_SECS, KUBECONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Serde default helpers ────────────────────────────────────────────────────

fn default_remote_path() -> String {
    KUBECONFIG_FILE.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ── Fetch options ────────────────────────────────────────────────────────────

/// Knobs of a single kubeconfig fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    /// Remote file to copy, relative to the SSH user's login directory
    /// unless absolute.
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
    /// TCP connect and SSH I/O timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            remote_path: default_remote_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetchOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ── Fetch summary ────────────────────────────────────────────────────────────

/// Serializable description of a completed fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSummary {
    pub endpoint: String,
    pub remote_path: String,
    pub local_path: String,
    pub size: u64,
    pub sha256: String,
    pub fetched_at: DateTime<Utc>,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = FetchOptions::default();
        assert_eq!(opts.remote_path, ".kube/config");
        assert_eq!(opts.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: FetchOptions = serde_json::from_str(r#"{"timeoutSecs": 5}"#).unwrap();
        assert_eq!(opts.timeout_secs, 5);
        assert_eq!(opts.remote_path, KUBECONFIG_FILE);
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let opts = FetchOptions {
            timeout_secs: 0,
            ..FetchOptions::default()
        };
        assert_eq!(opts.timeout(), Duration::from_secs(1));
    }
}
