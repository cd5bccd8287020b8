use crate::provider::{ProcessProvider, ServiceProvider};
use psdelta_common::types::Snapshot;
use tracing::{error, info};

/// Takes a point-in-time snapshot of processes and services.
///
/// A failing service enumeration does not fail the capture; it is logged and
/// the snapshot carries no services.
#[tracing::instrument(skip_all)]
pub fn capture(processes: &dyn ProcessProvider, services: &dyn ServiceProvider) -> Snapshot {
    let process_records = processes.list_processes();

    let service_records = services.list_services().unwrap_or_else(|e| {
        error!("Failed to enumerate services: {:#}", e);
        Vec::new()
    });

    info!(
        "Captured {} processes and {} services",
        process_records.len(),
        service_records.len()
    );
    Snapshot::new(process_records, service_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockProcessProvider, MockServiceProvider};
    use anyhow::anyhow;
    use psdelta_common::types::{ProcessRecord, ServiceRecord, ServiceStatus};

    fn process(name: &str, pid: u32) -> ProcessRecord {
        ProcessRecord {
            name: name.into(),
            pid,
            exe_path: format!("/usr/bin/{name}"),
            cmdline: vec![name.into()],
            create_time: 100.0,
        }
    }

    #[test]
    fn combines_processes_and_services() {
        let mut processes = MockProcessProvider::new();
        processes
            .expect_list_processes()
            .times(1)
            .returning(|| vec![process("bash", 1), process("sleep", 2)]);

        let mut services = MockServiceProvider::new();
        services.expect_list_services().times(1).returning(|| {
            Ok(vec![ServiceRecord {
                service_name: "Spooler".into(),
                display_name: "Print Spooler".into(),
                status: ServiceStatus::Running,
            }])
        });

        let snapshot = capture(&processes, &services);

        assert_eq!(snapshot.processes.len(), 2);
        assert_eq!(snapshot.processes[1].name, "sleep");
        assert_eq!(snapshot.services[0].service_name, "Spooler");
    }

    #[test]
    fn service_failure_yields_empty_service_list() {
        let mut processes = MockProcessProvider::new();
        processes
            .expect_list_processes()
            .returning(|| vec![process("bash", 1)]);

        let mut services = MockServiceProvider::new();
        services
            .expect_list_services()
            .returning(|| Err(anyhow!("access denied")));

        let snapshot = capture(&processes, &services);

        assert_eq!(snapshot.processes.len(), 1);
        assert!(snapshot.services.is_empty());
    }
}
