use super::{ProcessRecord, ServiceRecord};
use serde::{Deserialize, Serialize};

/// Point-in-time record of OS processes and services. Never mutated once captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub processes: Vec<ProcessRecord>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}

impl Snapshot {
    pub fn new(processes: Vec<ProcessRecord>, services: Vec<ServiceRecord>) -> Self {
        Self {
            processes,
            services,
        }
    }
}
