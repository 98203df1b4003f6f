//! # kubessh – credentials
//!
//! Username credentials used to open the SSH session:
//!   • Private-key (one or more keys, optional passphrase) and password secrets
//!   • Global and owner-scoped visibility with nested owners
//!   • The [`CredentialStore`] seam plus in-memory and JSON-file stores
//!   • Id resolution and the selectable-credential listing

pub mod credentials;

pub use credentials::*;
