//! Seams between the engine and the operating system.
//!
//! Everything that reads or mutates live OS state goes through one of these
//! traits, so the capture and executor logic can be driven by mocks in tests.
mod elevation;
mod launch_error;
mod processes;
mod services;
mod trust_zone;

pub use elevation::SystemElevation;
pub use launch_error::{unc_host, LaunchError};
pub use processes::SysinfoProcesses;
pub use services::SystemServices;
pub use trust_zone::SystemTrustZone;

use anyhow::Result;
use mockall::automock;
use psdelta_common::types::{ProcessRecord, ServiceRecord, ServiceStatus};
use std::collections::HashMap;

/// Service name -> names of the services it depends on.
pub type DependencyGraph = HashMap<String, Vec<String>>;

#[automock]
pub trait ProcessProvider {
    /// Enumerates live processes. Entries that vanish while being read are skipped.
    fn list_processes(&self) -> Vec<ProcessRecord>;

    /// Starts `command[0]` with the remaining elements as arguments and returns its PID.
    fn spawn(&self, command: &[String]) -> Result<u32, LaunchError>;

    /// Asks a live process (as returned by [`ProcessProvider::list_processes`]) to exit.
    fn terminate(&self, process: &ProcessRecord) -> Result<()>;
}

#[automock]
pub trait ServiceProvider {
    fn list_services(&self) -> Result<Vec<ServiceRecord>>;

    fn query_status(&self, service_name: &str) -> Result<ServiceStatus>;

    fn dependencies(&self) -> Result<DependencyGraph>;

    fn start(&self, service_name: &str) -> Result<()>;

    fn stop(&self, service_name: &str) -> Result<()>;

    fn restart(&self, service_name: &str) -> Result<()>;
}

/// Runs a command with elevated privileges. Fire-and-forget: success means the
/// request was accepted, not that the program is still running.
#[automock]
pub trait ElevatedLauncher {
    fn run_elevated(&self, command: &[String]) -> Result<(), LaunchError>;
}

/// Persists a host as trusted so launches from its network shares are not blocked.
#[automock]
pub trait TrustZoneRegistrar {
    fn register_trusted_host(&self, host: &str) -> Result<()>;
}
