/// Critical system processes and services that are never acted upon, whatever the
/// include patterns say.
pub const DEFAULT_EXCLUDES: [&str; 8] = [
    "System",
    "System Idle Process",
    "svchost.exe",
    "csrss.exe",
    "wininit.exe",
    "winlogon.exe",
    "services.exe",
    "lsass.exe",
];

/// Placeholder status written when a service exists in only one of two snapshots.
pub const NOT_PRESENT: &str = "Not Present";

pub const DEFAULT_CONFIG_FILE: &str = "psdelta.toml";
pub const ENV_PREFIX: &str = "PSDELTA";

/// Indentation used for snapshot and delta files.
pub const JSON_INDENT: &[u8] = b"    ";
