//! # kubessh – fetch
//!
//! Copies a remote kubeconfig to a local temporary file over SSH:
//!   • [`SshTransport`] / [`SshSession`] seam with an `ssh2` implementation
//!   • Session closed exactly once on every exit path
//!   • [`FetchedConfig`] – owned temporary file the caller must release
//!   • Client build step that always releases the fetched file
//!   • Kubeconfig summary builder (clusters, contexts, users)
//!   • `sshServer` / `sshCredentialsId` settings and their validation

pub mod fetch;

pub use fetch::*;
