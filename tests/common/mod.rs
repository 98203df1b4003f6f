#![allow(dead_code)]

use kubessh_lib::{Endpoint, KubeSshError, KubeSshResult, SshSession, SshTransport, UsernameCredential};
use mockall::mock;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const REMOTE_KUBECONFIG: &str = "apiVersion: v1
kind: Config
clusters:
- name: prod
  cluster:
    server: https://10.0.0.5:6443
contexts:
- name: prod-admin
  context:
    cluster: prod
    user: admin
current-context: prod-admin
users:
- name: admin
  user:
    token: not-a-real-token
";

mock! {
    pub Transport {}

    impl SshTransport for Transport {
        fn connect(
            &self,
            endpoint: &Endpoint,
            credential: &UsernameCredential,
            timeout: Duration,
        ) -> KubeSshResult<Box<dyn SshSession>>;
    }
}

/// Everything the fake collaborators were asked to do.
#[derive(Debug, Default)]
pub struct CallLog {
    pub connects: Vec<(Endpoint, String)>,
    pub copies: Vec<String>,
    pub closes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    Connect,
    Auth,
    Transfer,
    Close,
}

/// Serves fixed bytes for any remote path and records every call.
pub struct RecordingTransport {
    pub contents: Vec<u8>,
    pub fault: Fault,
    pub log: Arc<Mutex<CallLog>>,
}

impl RecordingTransport {
    pub fn new(contents: &str, fault: Fault) -> Self {
        Self {
            contents: contents.as_bytes().to_vec(),
            fault,
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    pub fn connects(&self) -> usize {
        self.log.lock().unwrap().connects.len()
    }
}

pub struct RecordingSession {
    contents: Vec<u8>,
    fault: Fault,
    log: Arc<Mutex<CallLog>>,
}

impl SshTransport for RecordingTransport {
    fn connect(
        &self,
        endpoint: &Endpoint,
        credential: &UsernameCredential,
        _timeout: Duration,
    ) -> KubeSshResult<Box<dyn SshSession>> {
        self.log
            .lock()
            .unwrap()
            .connects
            .push((endpoint.clone(), credential.id.clone()));
        match self.fault {
            Fault::Connect => Err(KubeSshError::connection_failed("connection refused")),
            Fault::Auth => Err(KubeSshError::auth_failed("publickey rejected")),
            _ => Ok(Box::new(RecordingSession {
                contents: self.contents.clone(),
                fault: self.fault,
                log: self.log.clone(),
            })),
        }
    }
}

impl SshSession for RecordingSession {
    fn copy_from(&mut self, remote_path: &str, sink: &mut dyn Write) -> KubeSshResult<u64> {
        self.log.lock().unwrap().copies.push(remote_path.to_string());
        if self.fault == Fault::Transfer {
            sink.write_all(&self.contents[..self.contents.len() / 2])?;
            return Err(KubeSshError::transfer_failed("channel closed mid-transfer"));
        }
        sink.write_all(&self.contents)?;
        Ok(self.contents.len() as u64)
    }

    fn close(&mut self) -> KubeSshResult<()> {
        self.log.lock().unwrap().closes += 1;
        if self.fault == Fault::Close {
            return Err(KubeSshError::connection_failed("disconnect failed"));
        }
        Ok(())
    }
}
