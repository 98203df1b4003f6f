// ── KubeconfigSource – fetch & client build ─────────────────────────────────

use crate::fetch::client::ClusterClientBuilder;
use crate::fetch::temp_file::{DigestWriter, FetchedConfig};
use crate::fetch::transport::{SessionGuard, SshTransport};
use crate::fetch::types::FetchOptions;
use kubessh_core::constants::KUBECONFIG_PREFIX;
use kubessh_core::{Endpoint, KubeSshError, KubeSshResult};
use kubessh_credentials::UsernameCredential;
use log::{debug, info, warn};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// A resolved endpoint and credential, ready to fetch the remote kubeconfig.
#[derive(Debug, Clone)]
pub struct KubeconfigSource {
    endpoint: Endpoint,
    credential: Arc<UsernameCredential>,
    options: FetchOptions,
}

impl KubeconfigSource {
    pub fn new(endpoint: Endpoint, credential: Arc<UsernameCredential>) -> Self {
        Self {
            endpoint,
            credential,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn credential(&self) -> &UsernameCredential {
        &self.credential
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    // ── Fetch ────────────────────────────────────────────────────────────────

    /// Copy the remote kubeconfig into a new temporary file under `workspace`.
    ///
    /// The session is closed before this returns, on success and on failure.
    /// No local file exists unless `Ok` is returned; on `Ok` the caller owns
    /// the file.
    pub fn fetch_config(
        &self,
        transport: &dyn SshTransport,
        workspace: &Path,
    ) -> KubeSshResult<FetchedConfig> {
        let address = self.endpoint.to_string();
        let remote_path = self.options.remote_path.as_str();
        let started = Instant::now();
        info!(
            "Fetching {} from {} as '{}'",
            remote_path, address, self.credential.username
        );

        let session = transport
            .connect(&self.endpoint, &self.credential, self.options.timeout())
            .map_err(|e| e.with_endpoint(address.clone()))?;
        let mut guard = SessionGuard::new(session, address.clone());

        // Allocated only once connected, so a failed connect leaves no file.
        let mut local = tempfile::Builder::new()
            .prefix(KUBECONFIG_PREFIX)
            .tempfile_in(workspace)
            .map_err(|e| {
                KubeSshError::io(format!(
                    "Cannot create temporary file in '{}': {}",
                    workspace.display(),
                    e
                ))
            })?;
        debug!("Copying {} into {}", remote_path, local.path().display());

        let (size, sha256) = {
            let mut sink = DigestWriter::new(BufWriter::new(local.as_file_mut()));
            guard
                .session()
                .copy_from(remote_path, &mut sink)
                .map_err(|e| e.with_endpoint(address.clone()))?;
            sink.finish().map_err(|e| {
                KubeSshError::io(format!("Failed to flush kubeconfig: {}", e))
            })?
        };
        local.as_file().sync_all()?;

        guard.close().map_err(|e| e.with_endpoint(address.clone()))?;

        // Closes the local handle; the path stays until released.
        let path = local.into_temp_path();
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Fetched {} bytes of {} from {} in {} ms",
            size, remote_path, address, duration_ms
        );

        Ok(FetchedConfig::new(
            path,
            address,
            remote_path.to_string(),
            size,
            sha256,
            duration_ms,
        ))
    }

    // ── Client build ─────────────────────────────────────────────────────────

    /// Fetch the kubeconfig, build a client from it, then delete the file
    /// whether or not the build succeeded.
    pub fn build_client<B: ClusterClientBuilder>(
        &self,
        transport: &dyn SshTransport,
        workspace: &Path,
        builder: &B,
    ) -> KubeSshResult<B::Client> {
        let fetched = self.fetch_config(transport, workspace)?;
        let built = builder.build(fetched.path());
        let released = fetched.release();

        match (built, released) {
            (Ok(client), Ok(())) => Ok(client),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), released) => {
                if let Err(release_err) = released {
                    warn!("{}", release_err);
                }
                Err(e.with_endpoint(self.endpoint.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::transport::SshSession;
    use kubessh_core::KubeSshErrorKind;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        connects: AtomicUsize,
        copies: AtomicUsize,
        closes: AtomicUsize,
    }

    #[derive(Clone, Copy)]
    enum Fault {
        None,
        Connect,
        Auth,
        MidTransfer,
    }

    struct FakeTransport {
        contents: Vec<u8>,
        fault: Fault,
        counters: Arc<Counters>,
    }

    struct FakeSession {
        contents: Vec<u8>,
        fault: Fault,
        counters: Arc<Counters>,
    }

    impl SshTransport for FakeTransport {
        fn connect(
            &self,
            _: &Endpoint,
            _: &UsernameCredential,
            _: Duration,
        ) -> KubeSshResult<Box<dyn SshSession>> {
            self.counters.connects.fetch_add(1, Ordering::SeqCst);
            match self.fault {
                Fault::Connect => Err(KubeSshError::connection_failed("refused")),
                Fault::Auth => Err(KubeSshError::auth_failed("denied")),
                _ => Ok(Box::new(FakeSession {
                    contents: self.contents.clone(),
                    fault: self.fault,
                    counters: self.counters.clone(),
                })),
            }
        }
    }

    impl SshSession for FakeSession {
        fn copy_from(&mut self, _: &str, sink: &mut dyn Write) -> KubeSshResult<u64> {
            self.counters.copies.fetch_add(1, Ordering::SeqCst);
            if let Fault::MidTransfer = self.fault {
                sink.write_all(&self.contents[..self.contents.len() / 2])?;
                return Err(KubeSshError::transfer_failed("connection reset"));
            }
            sink.write_all(&self.contents)?;
            Ok(self.contents.len() as u64)
        }

        fn close(&mut self) -> KubeSshResult<()> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn transport(fault: Fault) -> FakeTransport {
        FakeTransport {
            contents: b"apiVersion: v1\nkind: Config\n".to_vec(),
            fault,
            counters: Arc::new(Counters::default()),
        }
    }

    fn source() -> KubeconfigSource {
        KubeconfigSource::new(
            Endpoint::new("10.0.0.5", 2222),
            Arc::new(UsernameCredential::private_key("key-1", "azureuser", "KEY")),
        )
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_fetch_copies_bytes_and_closes_once() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::None);
        let fetched = source().fetch_config(&transport, dir.path()).unwrap();

        assert_eq!(std::fs::read(fetched.path()).unwrap(), transport.contents);
        assert_eq!(fetched.size(), transport.contents.len() as u64);
        assert_eq!(transport.counters.closes.load(Ordering::SeqCst), 1);
        let name = fetched.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(KUBECONFIG_PREFIX));

        fetched.release().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_connect_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::Connect);
        let err = source().fetch_config(&transport, dir.path()).unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::ConnectionFailed);
        assert_eq!(err.endpoint.as_deref(), Some("10.0.0.5:2222"));
        assert_eq!(transport.counters.copies.load(Ordering::SeqCst), 0);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_auth_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::Auth);
        let err = source().fetch_config(&transport, dir.path()).unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::AuthFailed);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_transfer_failure_closes_session_and_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::MidTransfer);
        let err = source().fetch_config(&transport, dir.path()).unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::TransferFailed);
        assert_eq!(transport.counters.closes.load(Ordering::SeqCst), 1);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_missing_workspace_closes_session() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let transport = transport(Fault::None);
        let err = source().fetch_config(&transport, &missing).unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::Io);
        assert_eq!(transport.counters.copies.load(Ordering::SeqCst), 0);
        assert_eq!(transport.counters.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_client_releases_file_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::None);
        let builder = |path: &Path| -> KubeSshResult<String> {
            Ok(std::fs::read_to_string(path)?)
        };
        let text = source()
            .build_client(&transport, dir.path(), &builder)
            .unwrap();
        assert!(text.starts_with("apiVersion: v1"));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_build_client_releases_file_on_builder_failure() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport(Fault::None);
        let builder =
            |_: &Path| -> KubeSshResult<()> { Err(KubeSshError::client_failed("bad config")) };
        let err = source()
            .build_client(&transport, dir.path(), &builder)
            .unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::ClientFailed);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_custom_remote_path_and_timeout() {
        let src = source().with_options(FetchOptions {
            remote_path: "/etc/kubernetes/admin.conf".into(),
            timeout_secs: 5,
        });
        assert_eq!(src.options().remote_path, "/etc/kubernetes/admin.conf");
        assert_eq!(src.options().timeout(), Duration::from_secs(5));
    }
}
