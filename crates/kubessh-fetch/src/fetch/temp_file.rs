// ── Owned temporary kubeconfig ───────────────────────────────────────────────

use crate::fetch::types::FetchSummary;
use chrono::{DateTime, Utc};
use kubessh_core::{KubeSshError, KubeSshResult};
use log::debug;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::Path;
use tempfile::TempPath;

/// A fetched kubeconfig on local disk.
///
/// The caller owns the file: call [`FetchedConfig::release`] once the file has
/// been consumed. Dropping an unreleased value still deletes the file, but
/// release errors are then lost.
#[must_use = "the fetched kubeconfig must be released once consumed"]
#[derive(Debug)]
pub struct FetchedConfig {
    path: TempPath,
    endpoint: String,
    remote_path: String,
    size: u64,
    sha256: String,
    fetched_at: DateTime<Utc>,
    duration_ms: u64,
}

impl FetchedConfig {
    pub(crate) fn new(
        path: TempPath,
        endpoint: String,
        remote_path: String,
        size: u64,
        sha256: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            path,
            endpoint,
            remote_path,
            size,
            sha256,
            fetched_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hex SHA-256 of the copied bytes.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn summary(&self) -> FetchSummary {
        FetchSummary {
            endpoint: self.endpoint.clone(),
            remote_path: self.remote_path.clone(),
            local_path: self.path.display().to_string(),
            size: self.size,
            sha256: self.sha256.clone(),
            fetched_at: self.fetched_at,
            duration_ms: self.duration_ms,
        }
    }

    /// Delete the local file.
    pub fn release(self) -> KubeSshResult<()> {
        let display = self.path.display().to_string();
        self.path.close().map_err(|e| {
            KubeSshError::io(format!("Failed to delete kubeconfig '{}': {}", display, e))
        })?;
        debug!("Released {}", display);
        Ok(())
    }
}

// ── Digesting writer ─────────────────────────────────────────────────────────

/// Forwards writes to `inner` while hashing and counting the bytes.
pub(crate) struct DigestWriter<W: Write> {
    inner: W,
    hasher: Sha256,
    written: u64,
}

impl<W: Write> DigestWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    /// Flush `inner` and return `(bytes written, hex SHA-256)`.
    pub(crate) fn finish(mut self) -> io::Result<(u64, String)> {
        self.inner.flush()?;
        Ok((self.written, hex::encode(self.hasher.finalize())))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
