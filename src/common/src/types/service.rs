use crate::constants::NOT_PRESENT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Current state of an OS service, as reported by the service control manager.
///
/// Serialized as the human-readable label (`"Start Pending"`, `"Unknown (9)"`, ...)
/// so files stay compatible with the snapshot format used since the first release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ServiceStatus {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    Unknown(u32),
    /// The service does not exist in one of the two compared snapshots.
    NotPresent,
}

impl ServiceStatus {
    /// Maps a numeric service-control-manager state (`SERVICE_STOPPED` = 1 ...
    /// `SERVICE_PAUSED` = 7).
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => ServiceStatus::Stopped,
            2 => ServiceStatus::StartPending,
            3 => ServiceStatus::StopPending,
            4 => ServiceStatus::Running,
            5 => ServiceStatus::ContinuePending,
            6 => ServiceStatus::PausePending,
            7 => ServiceStatus::Paused,
            other => ServiceStatus::Unknown(other),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Stopped => write!(f, "Stopped"),
            ServiceStatus::StartPending => write!(f, "Start Pending"),
            ServiceStatus::StopPending => write!(f, "Stop Pending"),
            ServiceStatus::Running => write!(f, "Running"),
            ServiceStatus::ContinuePending => write!(f, "Continue Pending"),
            ServiceStatus::PausePending => write!(f, "Pause Pending"),
            ServiceStatus::Paused => write!(f, "Paused"),
            ServiceStatus::Unknown(code) => write!(f, "Unknown ({})", code),
            ServiceStatus::NotPresent => write!(f, "{}", NOT_PRESENT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatusParseError(pub String);

impl fmt::Display for ServiceStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized service status: {:?}", self.0)
    }
}

impl Error for ServiceStatusParseError {}

impl FromStr for ServiceStatus {
    type Err = ServiceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "Stopped" => ServiceStatus::Stopped,
            "Start Pending" => ServiceStatus::StartPending,
            "Stop Pending" => ServiceStatus::StopPending,
            "Running" => ServiceStatus::Running,
            "Continue Pending" => ServiceStatus::ContinuePending,
            "Pause Pending" => ServiceStatus::PausePending,
            "Paused" => ServiceStatus::Paused,
            NOT_PRESENT => ServiceStatus::NotPresent,
            // a failed live query used to be recorded without a code
            "Unknown" => ServiceStatus::Unknown(0),
            other => {
                let code = other
                    .strip_prefix("Unknown (")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|code| code.trim().parse::<u32>().ok())
                    .ok_or_else(|| ServiceStatusParseError(other.to_string()))?;
                ServiceStatus::Unknown(code)
            }
        };
        Ok(status)
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for ServiceStatus {
    type Error = ServiceStatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub service_name: String,
    #[serde(default)]
    pub display_name: String,
    pub status: ServiceStatus,
}

/// Anything that can be addressed by its service-control-manager name.
pub trait ServiceNamed {
    fn service_name(&self) -> &str;

    fn display_name(&self) -> &str;
}

impl ServiceNamed for ServiceRecord {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}
