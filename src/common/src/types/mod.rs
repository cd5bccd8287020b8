pub mod action;
pub mod delta;
pub mod process;
pub mod service;
pub mod snapshot;

pub use action::Action;
pub use delta::{Delta, ServiceDelta};
pub use process::ProcessRecord;
pub use service::{ServiceNamed, ServiceRecord, ServiceStatus, ServiceStatusParseError};
pub use snapshot::Snapshot;

use serde::{Deserialize, Deserializer};

/// Deserializes a JSON `null` as the type's default value.
///
/// Snapshots written by older tooling carry `null` for fields the OS refused to
/// disclose (executable path and command line of protected processes).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
