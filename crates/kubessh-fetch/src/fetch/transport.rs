// ── Transport seam ───────────────────────────────────────────────────────────

use kubessh_core::{Endpoint, KubeSshResult};
use kubessh_credentials::UsernameCredential;
use log::{debug, warn};
use std::io::Write;
use std::time::Duration;

/// Opens authenticated SSH sessions.
pub trait SshTransport: Send + Sync {
    /// Connect and authenticate. Fails with `ConnectionFailed` or
    /// `AuthFailed`; a failed connect leaves nothing open.
    fn connect(
        &self,
        endpoint: &Endpoint,
        credential: &UsernameCredential,
        timeout: Duration,
    ) -> KubeSshResult<Box<dyn SshSession>>;
}

/// An open SSH session.
pub trait SshSession: Send {
    /// Stream the remote file at `remote_path` into `sink`, returning the
    /// number of bytes copied. The remote stream is closed before returning.
    fn copy_from(&mut self, remote_path: &str, sink: &mut dyn Write) -> KubeSshResult<u64>;

    /// Disconnect. Called exactly once per session.
    fn close(&mut self) -> KubeSshResult<()>;
}

// ── Scoped session ───────────────────────────────────────────────────────────

/// Owns a session and closes it exactly once: explicitly through
/// [`SessionGuard::close`], or on drop when an error unwinds the fetch.
pub(crate) struct SessionGuard {
    session: Box<dyn SshSession>,
    address: String,
    closed: bool,
}

impl SessionGuard {
    pub(crate) fn new(session: Box<dyn SshSession>, address: impl Into<String>) -> Self {
        Self {
            session,
            address: address.into(),
            closed: false,
        }
    }

    pub(crate) fn session(&mut self) -> &mut dyn SshSession {
        self.session.as_mut()
    }

    pub(crate) fn close(mut self) -> KubeSshResult<()> {
        self.closed = true;
        debug!("Closing SSH session to {}", self.address);
        self.session.close()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!("Closing SSH session to {} after failure", self.address);
        if let Err(e) = self.session.close() {
            warn!("Failed to close SSH session to {}: {}", self.address, e);
        }
    }
}
