// ── Credential store seam ────────────────────────────────────────────────────

use crate::credentials::types::UsernameCredential;
use std::sync::Arc;

/// Source of stored username credentials, queried per owner.
pub trait CredentialStore: Send + Sync {
    /// Every credential visible to `owner`, in store order.
    fn visible(&self, owner: &str) -> Vec<Arc<UsernameCredential>>;

    /// First credential visible to `owner` that satisfies `predicate`.
    fn find(
        &self,
        owner: &str,
        predicate: &dyn Fn(&UsernameCredential) -> bool,
    ) -> Option<Arc<UsernameCredential>> {
        self.visible(owner).into_iter().find(|c| predicate(c))
    }
}

/// Credentials held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: Vec<Arc<UsernameCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_credentials(credentials: impl IntoIterator<Item = UsernameCredential>) -> Self {
        Self {
            credentials: credentials.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn add(&mut self, credential: UsernameCredential) {
        self.credentials.push(Arc::new(credential));
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn visible(&self, owner: &str) -> Vec<Arc<UsernameCredential>> {
        self.credentials
            .iter()
            .filter(|c| c.scope.is_visible_to(owner))
            .cloned()
            .collect()
    }
}
