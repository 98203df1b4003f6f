//! # kubessh – core
//!
//! Types shared by every kubessh crate:
//!   • [`KubeSshError`] – categorised error carried through the whole fetch
//!   • [`Endpoint`] – `host[:port]` parsing for the SSH server setting
//!   • [`constants`] – default port, remote kubeconfig path, temp file prefix

pub mod constants;
pub mod endpoint;
pub mod error;

pub use endpoint::Endpoint;
pub use error::{KubeSshError, KubeSshErrorKind, KubeSshResult};
