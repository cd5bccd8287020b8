use super::TrustZoneRegistrar;
use anyhow::Result;

#[cfg_attr(not(windows), allow(dead_code))]
const ZONE_MAP_DOMAINS: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Internet Settings\ZoneMap\Domains";

/// Marks a file server as part of the Local Intranet zone (zone 1) for the
/// current user, which stops Windows from blocking executables on its shares.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrustZone;

impl SystemTrustZone {
    pub fn new() -> Self {
        Self
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn registry_key(host: &str) -> String {
    format!(r"{}\{}", ZONE_MAP_DOMAINS, host)
}

#[cfg(windows)]
impl TrustZoneRegistrar for SystemTrustZone {
    fn register_trusted_host(&self, host: &str) -> Result<()> {
        use anyhow::{bail, Context};
        use std::process::Command;
        use tracing::info;

        let output = Command::new("reg")
            .args(["add", &registry_key(host), "/v", "file", "/t", "REG_DWORD", "/d", "1", "/f"])
            .output()
            .context("Failed to run reg.exe")?;

        if !output.status.success() {
            bail!(
                "Failed to register {} as trusted: {}",
                host,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        info!("Registered {} in the Local Intranet zone", host);
        Ok(())
    }
}

#[cfg(not(windows))]
impl TrustZoneRegistrar for SystemTrustZone {
    fn register_trusted_host(&self, host: &str) -> Result<()> {
        anyhow::bail!("Cannot register {} as trusted: not supported on this platform", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_under_zone_map() {
        assert_eq!(
            registry_key("nas01"),
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Internet Settings\ZoneMap\Domains\nas01"
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_off_windows() {
        assert!(SystemTrustZone::new().register_trusted_host("nas01").is_err());
    }
}
