use anyhow::Result;
use psdelta_common::files::{load_json, save_json};
use psdelta_common::filter::NameFilter;
use psdelta_common::types::{Delta, Snapshot};
use psdelta_common::notice;
use psdelta_extracts::diff;
use std::path::Path;

pub fn compare(before: &Path, after: &Path, output: &Path, filter: &NameFilter) -> Result<()> {
    let before: Snapshot = load_json(before)?;
    let after: Snapshot = load_json(after)?;

    let delta = diff(&before, &after, filter);
    save_json(output, &delta)?;
    report_saved(&delta, output);
    Ok(())
}

pub(crate) fn report_saved(delta: &Delta, output: &Path) {
    notice::saved(
        output,
        format_args!(
            "delta with {} started, {} terminated, {} services changed",
            delta.processes_started.len(),
            delta.processes_terminated.len(),
            delta.services.len()
        ),
    );
}
