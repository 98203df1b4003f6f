// ── Shared constants ─────────────────────────────────────────────────────────

/// Port used when the SSH server setting carries no `:port` suffix.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Remote kubeconfig location, relative to the login directory of the SSH user.
pub const KUBECONFIG_FILE: &str = ".kube/config";

/// Prefix of the local temporary file the remote kubeconfig is copied into.
pub const KUBECONFIG_PREFIX: &str = "kubeconfig";

/// Sentinel value of the credential drop-down meaning "nothing selected".
pub const INVALID_OPTION: &str = "*";

/// Connect / read timeout applied to SSH sessions when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
