// ── kubessh-credentials / credentials module ─────────────────────────────────

pub mod json_store;
pub mod resolver;
pub mod store;
pub mod types;

pub use json_store::{load_credentials_file, parse_credentials};
pub use resolver::{list_credential_items, resolve_credential};
pub use store::{CredentialStore, InMemoryCredentialStore};
pub use types::*;
