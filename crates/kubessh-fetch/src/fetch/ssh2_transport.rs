// ── ssh2 (libssh2) transport ─────────────────────────────────────────────────

use crate::fetch::transport::{SshSession, SshTransport};
use kubessh_core::{Endpoint, KubeSshError, KubeSshResult};
use kubessh_credentials::{CredentialSecret, UsernameCredential};
use log::{debug, info, warn};
use secrecy::ExposeSecret;
use ssh2::Session;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

const CHUNK_SIZE: usize = 64 * 1024;

/// Production transport: TCP + libssh2, SCP for the file copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ssh2Transport;

impl Ssh2Transport {
    pub fn new() -> Self {
        Self
    }
}

impl SshTransport for Ssh2Transport {
    fn connect(
        &self,
        endpoint: &Endpoint,
        credential: &UsernameCredential,
        timeout: Duration,
    ) -> KubeSshResult<Box<dyn SshSession>> {
        let address = endpoint.to_string();
        info!("SSH connecting to {}", address);

        let tcp = connect_tcp(endpoint, timeout)?;

        let mut session = Session::new().map_err(|e| {
            KubeSshError::connection_failed(format!("Failed to create SSH session: {}", e))
        })?;
        session.set_timeout(timeout.as_millis().min(u32::MAX as u128) as u32);
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| {
            KubeSshError::connection_failed(format!("SSH handshake with {} failed: {}", address, e))
        })?;

        match authenticate(&session, credential) {
            Ok(method) => {
                info!(
                    "SSH authenticated to {} as '{}' via {}",
                    address, credential.username, method
                );
                Ok(Box::new(Ssh2Session { session, address }))
            }
            Err(e) => {
                session
                    .disconnect(None, "Authentication failed", None)
                    .ok();
                Err(e)
            }
        }
    }
}

fn connect_tcp(endpoint: &Endpoint, timeout: Duration) -> KubeSshResult<TcpStream> {
    let addrs: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|e| {
            KubeSshError::connection_failed(format!("Cannot resolve '{}': {}", endpoint, e))
        })?
        .collect();

    let mut last_error = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(tcp) => {
                debug!("TCP connected to {}", addr);
                return Ok(tcp);
            }
            Err(e) => {
                debug!("TCP connect to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(KubeSshError::connection_failed(match last_error {
        Some(e) => format!("TCP connection to {} failed: {}", endpoint, e),
        None => format!("'{}' resolved to no addresses", endpoint),
    }))
}

// ── Authentication ───────────────────────────────────────────────────────────

fn authenticate(session: &Session, credential: &UsernameCredential) -> KubeSshResult<String> {
    let username = credential.username.as_str();

    match &credential.secret {
        CredentialSecret::PrivateKey {
            private_keys,
            passphrase,
        } => {
            let passphrase = passphrase.as_ref().map(|p| p.expose_secret().as_str());
            let keys: Vec<&str> = private_keys.iter().map(|k| k.expose_secret().as_str()).collect();
            let idx = try_keys(&keys, |idx, key| {
                match session.userauth_pubkey_memory(username, None, key, passphrase) {
                    Ok(()) => session.authenticated(),
                    Err(e) => {
                        warn!("Private key #{} rejected for '{}': {}", idx + 1, username, e);
                        false
                    }
                }
            })
            .ok_or_else(|| {
                KubeSshError::auth_failed(format!(
                    "None of the {} private key(s) of credential '{}' were accepted for '{}'",
                    keys.len(),
                    credential.id,
                    username
                ))
            })?;
            Ok(format!("publickey(#{})", idx + 1))
        }
        CredentialSecret::Password { password } => {
            session
                .userauth_password(username, password.expose_secret())
                .map_err(|e| {
                    KubeSshError::auth_failed(format!(
                        "Password authentication failed for '{}': {}",
                        username, e
                    ))
                })?;
            if !session.authenticated() {
                return Err(KubeSshError::auth_failed(format!(
                    "Not authenticated as '{}' after password attempt",
                    username
                )));
            }
            Ok("password".into())
        }
    }
}

/// Offer each key in order; the index of the first one accepted wins.
fn try_keys<F>(keys: &[&str], mut attempt: F) -> Option<usize>
where
    F: FnMut(usize, &str) -> bool,
{
    keys.iter()
        .enumerate()
        .find_map(|(idx, key)| if attempt(idx, key) { Some(idx) } else { None })
}

// ── Session ──────────────────────────────────────────────────────────────────

struct Ssh2Session {
    session: Session,
    address: String,
}

impl SshSession for Ssh2Session {
    fn copy_from(&mut self, remote_path: &str, sink: &mut dyn Write) -> KubeSshResult<u64> {
        let (mut channel, stat) = self.session.scp_recv(Path::new(remote_path)).map_err(|e| {
            KubeSshError::transfer_failed(format!(
                "SCP recv init failed for '{}' on {}: {}",
                remote_path, self.address, e
            ))
        })?;
        let total_bytes = stat.size();

        let copied = copy_channel(&mut channel, sink, total_bytes);

        // Close the channel whatever the copy did
        channel.send_eof().ok();
        channel.wait_eof().ok();
        channel.close().ok();
        channel.wait_close().ok();

        let copied = check_complete(copied?, total_bytes, remote_path)?;
        debug!("SCP received {} bytes of {} from {}", copied, remote_path, self.address);
        Ok(copied)
    }

    fn close(&mut self) -> KubeSshResult<()> {
        self.session
            .disconnect(None, "Client disconnecting", None)
            .map_err(|e| {
                KubeSshError::connection_failed(format!(
                    "Failed to disconnect from {}: {}",
                    self.address, e
                ))
            })
    }
}

/// Copy at most `total_bytes` from `channel`; SCP follows the file with a
/// status byte that must not reach the sink.
fn copy_channel<R: Read>(channel: &mut R, sink: &mut dyn Write, total_bytes: u64) -> KubeSshResult<u64> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut transferred: u64 = 0;

    while transferred < total_bytes {
        let want = (total_bytes - transferred).min(CHUNK_SIZE as u64) as usize;
        let n = channel
            .read(&mut buffer[..want])
            .map_err(|e| KubeSshError::transfer_failed(format!("SCP read error: {}", e)))?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[..n])
            .map_err(|e| KubeSshError::transfer_failed(format!("Local write error: {}", e)))?;
        transferred += n as u64;
    }

    Ok(transferred)
}

fn check_complete(copied: u64, total_bytes: u64, remote_path: &str) -> KubeSshResult<u64> {
    if copied < total_bytes {
        return Err(KubeSshError::transfer_failed(format!(
            "Short read of '{}': {} of {} bytes",
            remote_path, copied, total_bytes
        )));
    }
    Ok(copied)
}
