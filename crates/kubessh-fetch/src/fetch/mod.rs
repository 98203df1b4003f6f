// ── kubessh-fetch / fetch module ─────────────────────────────────────────────

pub mod client;
pub mod service;
pub mod settings;
pub mod ssh2_transport;
pub mod temp_file;
pub mod transport;
pub mod types;

pub use client::{ClusterClientBuilder, KubeconfigSummary, KubeconfigSummaryBuilder};
pub use service::KubeconfigSource;
pub use settings::{FieldValidation, SshCredentialsConfig};
pub use ssh2_transport::Ssh2Transport;
pub use temp_file::FetchedConfig;
pub use transport::{SshSession, SshTransport};
pub use types::*;
