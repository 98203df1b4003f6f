// ── Cluster client construction ──────────────────────────────────────────────

use kubessh_core::{KubeSshError, KubeSshResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Builds a cluster client from a kubeconfig on local disk. The file is
/// deleted as soon as `build` returns, so implementations must read
/// everything they need before returning.
pub trait ClusterClientBuilder {
    type Client;

    fn build(&self, kubeconfig: &Path) -> KubeSshResult<Self::Client>;
}

impl<F, C> ClusterClientBuilder for F
where
    F: Fn(&Path) -> KubeSshResult<C>,
{
    type Client = C;

    fn build(&self, kubeconfig: &Path) -> KubeSshResult<C> {
        self(kubeconfig)
    }
}

// ── Kubeconfig document ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawKubeconfig {
    #[serde(rename = "apiVersion", default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    clusters: Vec<RawNamedCluster>,
    #[serde(default)]
    contexts: Vec<RawNamedContext>,
    #[serde(default)]
    users: Vec<RawNamedUser>,
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNamedCluster {
    name: String,
    cluster: RawCluster,
}

#[derive(Debug, Deserialize)]
struct RawCluster {
    server: String,
    #[serde(rename = "insecure-skip-tls-verify", default)]
    insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
struct RawNamedContext {
    name: String,
    context: RawContext,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    cluster: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNamedUser {
    name: String,
}

// ── Summary ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEntry {
    pub name: String,
    pub server: String,
    pub insecure_skip_tls_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub name: String,
    pub cluster: String,
    pub user: Option<String>,
    pub namespace: Option<String>,
}

/// What a fetched kubeconfig describes. Credentials embedded in the
/// document are not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeconfigSummary {
    pub api_version: Option<String>,
    pub current_context: Option<String>,
    pub clusters: Vec<ClusterEntry>,
    pub contexts: Vec<ContextEntry>,
    pub users: Vec<String>,
}

impl KubeconfigSummary {
    pub fn parse(yaml: &str) -> KubeSshResult<Self> {
        let raw: RawKubeconfig = serde_yaml::from_str(yaml)
            .map_err(|e| KubeSshError::client_failed(format!("Invalid kubeconfig: {}", e)))?;

        if let Some(kind) = raw.kind.as_deref() {
            if kind != "Config" {
                return Err(KubeSshError::client_failed(format!(
                    "Unexpected kubeconfig kind '{}'",
                    kind
                )));
            }
        }
        if raw.clusters.is_empty() {
            return Err(KubeSshError::client_failed("Kubeconfig defines no clusters"));
        }

        let summary = Self {
            api_version: raw.api_version,
            current_context: raw.current_context.filter(|c| !c.is_empty()),
            clusters: raw
                .clusters
                .into_iter()
                .map(|c| ClusterEntry {
                    name: c.name,
                    server: c.cluster.server,
                    insecure_skip_tls_verify: c.cluster.insecure_skip_tls_verify,
                })
                .collect(),
            contexts: raw
                .contexts
                .into_iter()
                .map(|c| ContextEntry {
                    name: c.name,
                    cluster: c.context.cluster,
                    user: c.context.user,
                    namespace: c.context.namespace,
                })
                .collect(),
            users: raw.users.into_iter().map(|u| u.name).collect(),
        };

        if let Some(current) = summary.current_context.as_deref() {
            if summary.context(current).is_none() {
                return Err(KubeSshError::client_failed(format!(
                    "current-context '{}' is not defined",
                    current
                )));
            }
        }

        Ok(summary)
    }

    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterEntry> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// API server of the current context, if it resolves.
    pub fn current_server(&self) -> Option<&str> {
        let context = self.context(self.current_context.as_deref()?)?;
        self.cluster(&context.cluster).map(|c| c.server.as_str())
    }
}

/// Reads a kubeconfig into a [`KubeconfigSummary`].
#[derive(Debug, Default, Clone, Copy)]
pub struct KubeconfigSummaryBuilder;

impl ClusterClientBuilder for KubeconfigSummaryBuilder {
    type Client = KubeconfigSummary;

    fn build(&self, kubeconfig: &Path) -> KubeSshResult<KubeconfigSummary> {
        let yaml = std::fs::read_to_string(kubeconfig).map_err(|e| {
            KubeSshError::client_failed(format!(
                "Cannot read kubeconfig '{}': {}",
                kubeconfig.display(),
                e
            ))
        })?;
        KubeconfigSummary::parse(&yaml)
    }
}
