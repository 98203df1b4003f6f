// ── Settings file ────────────────────────────────────────────────────────────
//
// {
//   "sshServer": "10.0.0.5:2222",
//   "sshCredentialsId": "key-1",
//   "owner": "team/app",
//   "credentialsFile": "credentials.json",
//   "workspace": "/var/tmp/kubessh",
//   "remotePath": ".kube/config",
//   "timeoutSecs": 30
// }

use kubessh_core::{KubeSshError, KubeSshResult};
use kubessh_fetch::{FetchOptions, SshCredentialsConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(flatten)]
    pub ssh: SshCredentialsConfig,
    /// Owner the credential lookup is scoped to; empty means global only.
    #[serde(default)]
    pub owner: String,
    /// Relative paths are resolved against the settings file's directory.
    pub credentials_file: PathBuf,
    /// Directory the temporary kubeconfig is created in; defaults to the
    /// system temp directory.
    #[serde(default)]
    pub workspace: Option<PathBuf>,
    #[serde(flatten)]
    pub fetch: FetchOptions,
}

impl AppConfig {
    pub fn parse(json: &str) -> KubeSshResult<Self> {
        let config: AppConfig = serde_json::from_str(json)
            .map_err(|e| KubeSshError::invalid_config(format!("Invalid settings: {}", e)))?;
        config.ssh.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> KubeSshResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KubeSshError::invalid_config(format!(
                "Cannot read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config = Self::parse(&json)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.credentials_file.is_relative() {
            self.credentials_file = base.join(&self.credentials_file);
        }
        if let Some(ws) = self.workspace.as_mut() {
            if ws.is_relative() {
                *ws = base.join(&*ws);
            }
        }
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.workspace.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubessh_core::KubeSshErrorKind;

    const SETTINGS: &str = r#"{
        "sshServer": " 10.0.0.5:2222 ",
        "sshCredentialsId": "key-1",
        "owner": "team/app",
        "credentialsFile": "creds.json",
        "workspace": "work",
        "timeoutSecs": 10
    }"#;

    #[test]
    fn test_parse_settings() {
        let config = AppConfig::parse(SETTINGS).unwrap();
        assert_eq!(config.ssh.ssh_server(), "10.0.0.5:2222");
        assert_eq!(config.ssh.ssh_credentials_id(), "key-1");
        assert_eq!(config.owner, "team/app");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.remote_path, ".kube/config");
    }

    #[test]
    fn test_parse_rejects_sentinel_credentials() {
        let json = r#"{"sshServer": "h", "sshCredentialsId": "*", "credentialsFile": "c.json"}"#;
        let err = AppConfig::parse(json).unwrap_err();
        assert_eq!(err.kind, KubeSshErrorKind::InvalidConfig);
    }

    #[test]
    fn test_parse_requires_credentials_file() {
        let json = r#"{"sshServer": "h", "sshCredentialsId": "k"}"#;
        assert!(AppConfig::parse(json).is_err());
    }

    #[test]
    fn test_relative_paths_resolved() {
        let mut config = AppConfig::parse(SETTINGS).unwrap();
        config.resolve_relative_to(Path::new("/etc/kubessh"));
        assert_eq!(config.credentials_file, PathBuf::from("/etc/kubessh/creds.json"));
        assert_eq!(config.workspace_dir(), PathBuf::from("/etc/kubessh/work"));
    }

    #[test]
    fn test_workspace_defaults_to_temp_dir() {
        let json = r#"{"sshServer": "h", "sshCredentialsId": "k", "credentialsFile": "/c.json"}"#;
        let config = AppConfig::parse(json).unwrap();
        assert_eq!(config.workspace_dir(), std::env::temp_dir());
    }
}
