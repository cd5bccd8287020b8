use itertools::Itertools;
use psdelta_common::filter::NameFilter;
use psdelta_common::types::{
    Delta, ProcessRecord, ServiceDelta, ServiceRecord, ServiceStatus, Snapshot,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Computes what changed between two snapshots.
///
/// Processes are compared by UID, services by service name. Output follows the
/// order of the input lists: terminated processes and changed or removed
/// services in `before` order, started processes and added services in `after`
/// order.
pub fn diff(before: &Snapshot, after: &Snapshot, filter: &NameFilter) -> Delta {
    let before_uids: HashSet<String> = before.processes.iter().map(ProcessRecord::uid).collect();
    let after_uids: HashSet<String> = after.processes.iter().map(ProcessRecord::uid).collect();

    let processes_terminated = only_in(&before.processes, &after_uids, filter);
    let processes_started = only_in(&after.processes, &before_uids, filter);
    let services = service_changes(&before.services, &after.services, filter);

    debug!(
        "Delta: {} terminated, {} started, {} services changed",
        processes_terminated.len(),
        processes_started.len(),
        services.len()
    );

    Delta {
        processes_terminated,
        processes_started,
        services,
    }
}

fn only_in(
    records: &[ProcessRecord],
    other_uids: &HashSet<String>,
    filter: &NameFilter,
) -> Vec<ProcessRecord> {
    records
        .iter()
        .unique_by(|record| record.uid())
        .filter(|record| !other_uids.contains(&record.uid()))
        .filter(|record| filter.passes(&record.name))
        .cloned()
        .collect()
}

fn service_changes(
    before: &[ServiceRecord],
    after: &[ServiceRecord],
    filter: &NameFilter,
) -> Vec<ServiceDelta> {
    let after_by_name: HashMap<&str, &ServiceRecord> = after
        .iter()
        .rev()
        .map(|svc| (svc.service_name.as_str(), svc))
        .collect();
    let before_names: HashSet<&str> = before.iter().map(|svc| svc.service_name.as_str()).collect();

    let changed_or_removed = before
        .iter()
        .unique_by(|svc| svc.service_name.as_str())
        .filter_map(|old| match after_by_name.get(old.service_name.as_str()) {
            Some(new) if new.status == old.status => None,
            Some(new) => Some(service_delta(old, old.status, new.status)),
            None => Some(service_delta(old, old.status, ServiceStatus::NotPresent)),
        });

    let added = after
        .iter()
        .unique_by(|svc| svc.service_name.as_str())
        .filter(|new| !before_names.contains(new.service_name.as_str()))
        .map(|new| service_delta(new, ServiceStatus::NotPresent, new.status));

    changed_or_removed
        .chain(added)
        .filter(|delta| filter.passes(&delta.service_name))
        .collect()
}

fn service_delta(
    source: &ServiceRecord,
    status_before: ServiceStatus,
    status_after: ServiceStatus,
) -> ServiceDelta {
    ServiceDelta {
        service_name: source.service_name.clone(),
        display_name: source.display_name.clone(),
        status_before,
        status_after,
    }
}
