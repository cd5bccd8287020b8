use super::{ProcessRecord, ServiceNamed, ServiceStatus};
use serde::{Deserialize, Serialize};

/// A service whose status differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDelta {
    pub service_name: String,
    #[serde(default)]
    pub display_name: String,
    pub status_before: ServiceStatus,
    pub status_after: ServiceStatus,
}

impl ServiceNamed for ServiceDelta {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Structural difference between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub processes_terminated: Vec<ProcessRecord>,
    #[serde(default)]
    pub processes_started: Vec<ProcessRecord>,
    #[serde(default)]
    pub services: Vec<ServiceDelta>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.processes_terminated.is_empty()
            && self.processes_started.is_empty()
            && self.services.is_empty()
    }

    /// Services whose status before the change matches `status`.
    pub fn services_before(&self, status: ServiceStatus) -> Vec<&ServiceDelta> {
        self.services
            .iter()
            .filter(|svc| svc.status_before == status)
            .collect()
    }

    /// Services whose status after the change matches `status`.
    pub fn services_after(&self, status: ServiceStatus) -> Vec<&ServiceDelta> {
        self.services
            .iter()
            .filter(|svc| svc.status_after == status)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_file_written_by_the_python_tool() {
        let json = r#"{
            "processes_terminated": [],
            "processes_started": [
                {"name": "code.exe", "pid": 9, "exe": "C:\\code.exe", "cmdline": ["C:\\code.exe"], "create_time": 1718000000.123}
            ],
            "services": [
                {"service_name": "BITS", "display_name": "Background Intelligent Transfer Service",
                 "status_before": "Not Present", "status_after": "Running"}
            ]
        }"#;
        let delta: Delta = serde_json::from_str(json).unwrap();

        assert_eq!(delta.processes_started.len(), 1);
        assert_eq!(delta.services[0].status_before, ServiceStatus::NotPresent);
        assert_eq!(delta.services_after(ServiceStatus::Running).len(), 1);
        assert!(delta.services_before(ServiceStatus::Stopped).is_empty());
        assert!(!delta.is_empty());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let delta: Delta = serde_json::from_str("{}").unwrap();
        assert!(delta.is_empty());
    }
}
