// ── Types ─────────────────────────────────────────────────────────────────────

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ── Scope ────────────────────────────────────────────────────────────────────

/// Where a credential is visible.
///
/// Owners are `/`-separated paths (`team/app/deploy`). A credential owned by
/// `team/app` is visible to `team/app` and every owner nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialScope {
    #[default]
    Global,
    Owner(String),
}

impl CredentialScope {
    pub fn is_visible_to(&self, owner: &str) -> bool {
        match self {
            CredentialScope::Global => true,
            CredentialScope::Owner(scope) => {
                let scope = scope.trim_end_matches('/');
                owner == scope
                    || owner
                        .strip_prefix(scope)
                        .map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }
}

// ── Secret material ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CredentialSecret {
    /// One or more PEM / OpenSSH private keys, tried in order.
    PrivateKey {
        #[serde(rename = "privateKeys")]
        private_keys: Vec<SecretString>,
        #[serde(default)]
        passphrase: Option<SecretString>,
    },
    Password { password: SecretString },
}

impl CredentialSecret {
    pub fn kind_label(&self) -> &'static str {
        match self {
            CredentialSecret::PrivateKey { .. } => "privateKey",
            CredentialSecret::Password { .. } => "password",
        }
    }
}

// ── Credential ───────────────────────────────────────────────────────────────

/// A stored username credential. Secret material stays inside `secrecy`
/// wrappers and prints as `[REDACTED]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameCredential {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: CredentialScope,
    #[serde(flatten)]
    pub secret: CredentialSecret,
}

impl UsernameCredential {
    pub fn private_key(
        id: impl Into<String>,
        username: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            description: None,
            scope: CredentialScope::Global,
            secret: CredentialSecret::PrivateKey {
                private_keys: vec![SecretString::new(key.into())],
                passphrase: None,
            },
        }
    }

    pub fn password(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            description: None,
            scope: CredentialScope::Global,
            secret: CredentialSecret::Password {
                password: SecretString::new(password.into()),
            },
        }
    }

    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the passphrase of a private-key credential. No effect on passwords.
    pub fn with_passphrase(mut self, value: impl Into<String>) -> Self {
        if let CredentialSecret::PrivateKey { passphrase, .. } = &mut self.secret {
            *passphrase = Some(SecretString::new(value.into()));
        }
        self
    }

    /// Label shown in credential pickers.
    pub fn display_name(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{} ({})", self.username, desc),
            _ => self.username.clone(),
        }
    }
}

// ── Listing ──────────────────────────────────────────────────────────────────

/// One entry of the credential drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialListItem {
    pub name: String,
    pub value: String,
}
