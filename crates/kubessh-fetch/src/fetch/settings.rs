// ── Connection settings – `sshServer` / `sshCredentialsId` ───────────────────

use crate::fetch::service::KubeconfigSource;
use kubessh_core::constants::INVALID_OPTION;
use kubessh_core::{Endpoint, KubeSshError, KubeSshResult};
use kubessh_credentials::{list_credential_items, resolve_credential, CredentialListItem, CredentialStore};
use serde::{Deserialize, Deserializer, Serialize};

pub const SSH_SERVER_REQUIRED: &str = "SSH server is required";
pub const SSH_CREDENTIALS_REQUIRED: &str = "SSH credentials are required";

/// Outcome of validating a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum FieldValidation {
    Ok,
    Error(String),
}

impl FieldValidation {
    pub fn is_ok(&self) -> bool {
        matches!(self, FieldValidation::Ok)
    }
}

fn trim_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).unwrap_or_default())
}

/// User-facing settings naming the SSH server and the stored credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshCredentialsConfig {
    #[serde(default, deserialize_with = "trim_to_empty")]
    ssh_server: String,
    #[serde(default)]
    ssh_credentials_id: String,
}

impl SshCredentialsConfig {
    pub fn new(ssh_server: &str, ssh_credentials_id: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_ssh_server(Some(ssh_server));
        config.set_ssh_credentials_id(ssh_credentials_id);
        config
    }

    pub fn ssh_server(&self) -> &str {
        &self.ssh_server
    }

    /// Stores the trimmed value; `None` becomes empty.
    pub fn set_ssh_server(&mut self, value: Option<&str>) {
        self.ssh_server = value.map(str::trim).unwrap_or_default().to_string();
    }

    pub fn ssh_credentials_id(&self) -> &str {
        &self.ssh_credentials_id
    }

    pub fn set_ssh_credentials_id(&mut self, value: impl Into<String>) {
        self.ssh_credentials_id = value.into();
    }

    // ── Field validation ─────────────────────────────────────────────────────

    pub fn validate_ssh_server(value: &str) -> FieldValidation {
        if value.trim().is_empty() {
            FieldValidation::Error(SSH_SERVER_REQUIRED.into())
        } else {
            FieldValidation::Ok
        }
    }

    pub fn validate_ssh_credentials_id(value: &str) -> FieldValidation {
        if value.trim().is_empty() || value.trim() == INVALID_OPTION {
            FieldValidation::Error(SSH_CREDENTIALS_REQUIRED.into())
        } else {
            FieldValidation::Ok
        }
    }

    /// Both fields at once, as an `InvalidConfig` error listing every problem.
    pub fn validate(&self) -> KubeSshResult<()> {
        let problems: Vec<String> = [
            Self::validate_ssh_server(&self.ssh_server),
            Self::validate_ssh_credentials_id(&self.ssh_credentials_id),
        ]
        .into_iter()
        .filter_map(|v| match v {
            FieldValidation::Ok => None,
            FieldValidation::Error(msg) => Some(msg),
        })
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(KubeSshError::invalid_config(problems.join("; ")))
        }
    }

    // ── Derived values ───────────────────────────────────────────────────────

    pub fn endpoint(&self) -> KubeSshResult<Endpoint> {
        Endpoint::parse(&self.ssh_server)
    }

    pub fn host(&self) -> KubeSshResult<String> {
        Ok(self.endpoint()?.host)
    }

    pub fn port(&self) -> KubeSshResult<u16> {
        Ok(self.endpoint()?.port)
    }

    /// Parse the endpoint and resolve the credential visible to `owner`.
    /// Nothing is contacted over the network.
    pub fn build_source(
        &self,
        owner: &str,
        store: &dyn CredentialStore,
    ) -> KubeSshResult<KubeconfigSource> {
        let endpoint = self.endpoint()?;
        let credential = resolve_credential(store, owner, &self.ssh_credentials_id)?;
        Ok(KubeconfigSource::new(endpoint, credential))
    }

    /// Entries for the credential picker.
    pub fn credential_items(owner: &str, store: &dyn CredentialStore) -> Vec<CredentialListItem> {
        list_credential_items(store, owner)
    }
}
