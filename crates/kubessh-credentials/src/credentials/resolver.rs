// ── Credential resolution & listing ─────────────────────────────────────────

use crate::credentials::store::CredentialStore;
use crate::credentials::types::{CredentialListItem, UsernameCredential};
use kubessh_core::constants::INVALID_OPTION;
use kubessh_core::{KubeSshError, KubeSshResult};
use log::debug;
use std::sync::Arc;

/// Label of the leading "nothing selected" entry of the credential list.
pub const SELECT_CREDENTIALS_LABEL: &str = "--- Select SSH credentials ---";

/// Resolve `id` among the credentials visible to `owner`.
///
/// A missing id is a hard error; there is no fallback credential.
pub fn resolve_credential(
    store: &dyn CredentialStore,
    owner: &str,
    id: &str,
) -> KubeSshResult<Arc<UsernameCredential>> {
    let found = store.find(owner, &|c: &UsernameCredential| c.id == id);
    match found {
        Some(cred) => {
            debug!(
                "Resolved credential '{}' ({}) for owner '{}'",
                id,
                cred.secret.kind_label(),
                owner
            );
            Ok(cred)
        }
        None => Err(KubeSshError::credential_not_found(id)),
    }
}

/// Entries for the credential picker: the sentinel first, then every visible
/// credential.
pub fn list_credential_items(store: &dyn CredentialStore, owner: &str) -> Vec<CredentialListItem> {
    let mut items = vec![CredentialListItem {
        name: SELECT_CREDENTIALS_LABEL.to_string(),
        value: INVALID_OPTION.to_string(),
    }];
    items.extend(store.visible(owner).iter().map(|c| CredentialListItem {
        name: c.display_name(),
        value: c.id.clone(),
    }));
    items
}
