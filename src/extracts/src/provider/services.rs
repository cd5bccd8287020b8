use super::{DependencyGraph, ServiceProvider};
use anyhow::{Context, Result};
use psdelta_common::types::{ServiceRecord, ServiceStatus};
use serde::Deserialize;

#[cfg(windows)]
use anyhow::bail;
#[cfg(windows)]
use std::process::Command;
#[cfg(windows)]
use tracing::{debug, trace};

#[cfg(not(windows))]
use tracing::debug;

#[cfg(windows)]
const LIST_SERVICES_SCRIPT: &str = "ConvertTo-Json -Compress -Depth 3 -InputObject @(Get-Service | \
     ForEach-Object { [PSCustomObject]@{ \
     service_name = $_.Name; \
     display_name = $_.DisplayName; \
     status = [int]$_.Status; \
     depends_on = @($_.ServicesDependedOn | ForEach-Object { $_.Name }) } })";

/// Service control through the Windows service control manager, driven by
/// PowerShell's service cmdlets. Other platforms have no services to report.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemServices;

impl SystemServices {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListedService {
    service_name: String,
    #[serde(default)]
    display_name: Option<String>,
    status: u32,
    #[serde(default)]
    depends_on: Option<OneOrMany<String>>,
}

/// Parses the JSON emitted by the service listing script into records and the
/// dependency graph. PowerShell unwraps single-element arrays, so both a bare
/// object and a bare string are accepted where a list is expected.
#[cfg_attr(not(windows), allow(dead_code))]
fn parse_service_listing(json: &str) -> Result<(Vec<ServiceRecord>, DependencyGraph)> {
    let json = json.trim();
    if json.is_empty() {
        return Ok((Vec::new(), DependencyGraph::new()));
    }

    let listed: OneOrMany<ListedService> =
        serde_json::from_str(json).context("Failed to parse service listing")?;

    let mut records = Vec::new();
    let mut graph = DependencyGraph::new();
    for service in listed.into_vec() {
        let depends_on = service
            .depends_on
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if !depends_on.is_empty() {
            graph.insert(service.service_name.clone(), depends_on);
        }
        records.push(ServiceRecord {
            display_name: service.display_name.unwrap_or_default(),
            status: ServiceStatus::from_code(service.status),
            service_name: service.service_name,
        });
    }
    Ok((records, graph))
}

/// Wraps a value in single quotes for a PowerShell command line.
#[cfg_attr(not(windows), allow(dead_code))]
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(windows)]
fn run_powershell_command(script: &str) -> Result<String> {
    trace!("Running PowerShell: {}", script);
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .context("Failed to run powershell")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("PowerShell command failed: {}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(windows)]
impl SystemServices {
    fn listing(&self) -> Result<(Vec<ServiceRecord>, DependencyGraph)> {
        let json = run_powershell_command(LIST_SERVICES_SCRIPT)?;
        parse_service_listing(&json)
    }

    fn control(&self, cmdlet: &str, service_name: &str) -> Result<()> {
        let script = format!("{} -Name {} -ErrorAction Stop", cmdlet, quote(service_name));
        run_powershell_command(&script)
            .with_context(|| format!("{} failed for service {}", cmdlet, service_name))?;
        Ok(())
    }
}

#[cfg(windows)]
impl ServiceProvider for SystemServices {
    #[tracing::instrument(skip(self))]
    fn list_services(&self) -> Result<Vec<ServiceRecord>> {
        let (records, _) = self.listing()?;
        debug!("Enumerated {} services", records.len());
        Ok(records)
    }

    fn query_status(&self, service_name: &str) -> Result<ServiceStatus> {
        let script = format!(
            "[int](Get-Service -Name {} -ErrorAction Stop).Status",
            quote(service_name)
        );
        let output = run_powershell_command(&script)
            .with_context(|| format!("Failed to query service {}", service_name))?;
        let code = output
            .parse::<u32>()
            .with_context(|| format!("Unexpected status output {:?}", output))?;
        Ok(ServiceStatus::from_code(code))
    }

    fn dependencies(&self) -> Result<DependencyGraph> {
        let (_, graph) = self.listing()?;
        Ok(graph)
    }

    fn start(&self, service_name: &str) -> Result<()> {
        self.control("Start-Service", service_name)
    }

    fn stop(&self, service_name: &str) -> Result<()> {
        self.control("Stop-Service", service_name)
    }

    fn restart(&self, service_name: &str) -> Result<()> {
        self.control("Restart-Service", service_name)
    }
}

#[cfg(not(windows))]
impl ServiceProvider for SystemServices {
    fn list_services(&self) -> Result<Vec<ServiceRecord>> {
        debug!("Service enumeration is not available on this platform");
        Ok(Vec::new())
    }

    fn query_status(&self, service_name: &str) -> Result<ServiceStatus> {
        anyhow::bail!("Cannot query service {}: not supported on this platform", service_name)
    }

    fn dependencies(&self) -> Result<DependencyGraph> {
        Ok(DependencyGraph::new())
    }

    fn start(&self, service_name: &str) -> Result<()> {
        anyhow::bail!("Cannot start service {}: not supported on this platform", service_name)
    }

    fn stop(&self, service_name: &str) -> Result<()> {
        anyhow::bail!("Cannot stop service {}: not supported on this platform", service_name)
    }

    fn restart(&self, service_name: &str) -> Result<()> {
        anyhow::bail!("Cannot restart service {}: not supported on this platform", service_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions_sorted::assert_eq;

    #[test]
    fn parses_listing_and_dependencies() {
        let json = r#"[
            {"service_name":"Spooler","display_name":"Print Spooler","status":4,"depends_on":["RPCSS","http"]},
            {"service_name":"RPCSS","display_name":"Remote Procedure Call (RPC)","status":4,"depends_on":[]},
            {"service_name":"BITS","display_name":null,"status":1,"depends_on":"RPCSS"}
        ]"#;
        let (records, graph) = parse_service_listing(json).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].service_name, "Spooler");
        assert_eq!(records[0].status, ServiceStatus::Running);
        assert_eq!(records[2].display_name, "");
        assert_eq!(records[2].status, ServiceStatus::Stopped);

        assert_eq!(graph["Spooler"], vec!["RPCSS".to_string(), "http".to_string()]);
        assert_eq!(graph["BITS"], vec!["RPCSS".to_string()]);
        assert!(!graph.contains_key("RPCSS"));
    }

    #[test]
    fn single_service_object_is_accepted() {
        let json = r#"{"service_name":"Only","display_name":"Only One","status":7}"#;
        let (records, graph) = parse_service_listing(json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, ServiceStatus::Paused);
        assert!(graph.is_empty());
    }

    #[test]
    fn unknown_codes_are_kept() {
        let json = r#"[{"service_name":"Odd","display_name":"Odd","status":12}]"#;
        let (records, _) = parse_service_listing(json).unwrap();
        assert_eq!(records[0].status, ServiceStatus::Unknown(12));
    }

    #[test]
    fn empty_output_is_an_empty_listing() {
        let (records, graph) = parse_service_listing("  \n").unwrap();
        assert!(records.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn malformed_output_is_an_error() {
        assert!(parse_service_listing("Get-Service : access denied").is_err());
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote("Bob's Service"), "'Bob''s Service'");
    }

    #[cfg(not(windows))]
    #[test]
    fn non_windows_has_no_services() {
        let services = SystemServices::new();
        assert!(services.list_services().unwrap().is_empty());
        assert!(services.dependencies().unwrap().is_empty());
        assert!(services.query_status("Spooler").is_err());
        assert!(services.stop("Spooler").is_err());
    }
}
