//! # kubessh
//!
//! Fetches a kubeconfig from a remote host over SSH with a stored credential,
//! summarises it, and removes the local copy again.

pub mod app_config;
pub mod logging;

pub use app_config::AppConfig;
pub use kubessh_core::{Endpoint, KubeSshError, KubeSshErrorKind, KubeSshResult};
pub use kubessh_credentials::{
    load_credentials_file, CredentialStore, InMemoryCredentialStore, UsernameCredential,
};
pub use kubessh_fetch::{
    KubeconfigSource, KubeconfigSummary, KubeconfigSummaryBuilder, Ssh2Transport,
    SshCredentialsConfig, SshSession, SshTransport,
};

use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Output of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub endpoint: String,
    pub username: String,
    pub remote_path: String,
    pub kubeconfig: KubeconfigSummary,
}

/// Resolve, fetch and summarise using `transport`. The temporary kubeconfig
/// never outlives this call.
pub fn run_with(
    config: &AppConfig,
    store: &dyn CredentialStore,
    transport: &dyn SshTransport,
) -> KubeSshResult<RunReport> {
    let source = config
        .ssh
        .build_source(&config.owner, store)?
        .with_options(config.fetch.clone());

    let kubeconfig =
        source.build_client(transport, &config.workspace_dir(), &KubeconfigSummaryBuilder)?;
    info!(
        endpoint = %source.endpoint(),
        clusters = kubeconfig.clusters.len(),
        current_context = ?kubeconfig.current_context,
        "kubeconfig summarised"
    );

    Ok(RunReport {
        endpoint: source.endpoint().to_string(),
        username: source.credential().username.clone(),
        remote_path: source.options().remote_path.clone(),
        kubeconfig,
    })
}

/// Load the settings file and its credential file, then fetch over `ssh2`.
pub fn run(settings_path: &Path) -> KubeSshResult<RunReport> {
    let config = AppConfig::load(settings_path)?;
    let store = load_credentials_file(&config.credentials_file)?;
    run_with(&config, &store, &Ssh2Transport::new())
}
