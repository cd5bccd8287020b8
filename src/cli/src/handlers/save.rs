use anyhow::Result;
use psdelta_common::files::save_json;
use psdelta_common::notice;
use psdelta_extracts::capture;
use psdelta_extracts::provider::{SysinfoProcesses, SystemServices};
use std::path::Path;

pub fn save(output: &Path) -> Result<()> {
    let snapshot = capture(&SysinfoProcesses::new(), &SystemServices::new());
    save_json(output, &snapshot)?;

    notice::saved(
        output,
        format_args!(
            "snapshot of {} processes and {} services",
            snapshot.processes.len(),
            snapshot.services.len()
        ),
    );
    Ok(())
}
