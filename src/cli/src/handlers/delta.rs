use super::compare::report_saved;
use anyhow::{Context, Result};
use psdelta_common::files::save_json;
use psdelta_common::filter::NameFilter;
use psdelta_common::types::Snapshot;
use psdelta_common::notice;
use psdelta_extracts::provider::{SysinfoProcesses, SystemServices};
use psdelta_extracts::{capture, diff};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::info;

/// What to do between the two snapshots of `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPause {
    Immediate,
    /// Block until Enter is pressed.
    Enter,
    Seconds(u64),
}

impl SnapshotPause {
    pub fn from_args(wait: bool, delay: Option<u64>) -> Self {
        match (wait, delay) {
            (true, _) => SnapshotPause::Enter,
            (false, Some(seconds)) if seconds > 0 => SnapshotPause::Seconds(seconds),
            _ => SnapshotPause::Immediate,
        }
    }

    fn pause(self) -> Result<()> {
        match self {
            SnapshotPause::Immediate => {}
            SnapshotPause::Enter => {
                notice::prompt("Press Enter to capture the modified snapshot...");
                io::stdout().flush().context("Failed to flush stdout")?;
                let mut line = String::new();
                io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .context("Failed to read from stdin")?;
            }
            SnapshotPause::Seconds(seconds) => {
                info!("Waiting for {} seconds...", seconds);
                thread::sleep(Duration::from_secs(seconds));
            }
        }
        Ok(())
    }
}

fn capture_and_save(label: &str, save_to: Option<&Path>) -> Result<Snapshot> {
    info!("Capturing {} snapshot...", label);
    let snapshot = capture(&SysinfoProcesses::new(), &SystemServices::new());
    if let Some(path) = save_to {
        save_json(path, &snapshot)?;
        info!("Saved {} snapshot to {}", label, path.display());
    }
    Ok(snapshot)
}

pub fn delta(
    output: &Path,
    save_initial: Option<&Path>,
    save_modified: Option<&Path>,
    pause: SnapshotPause,
    filter: &NameFilter,
) -> Result<()> {
    let initial = capture_and_save("initial", save_initial)?;
    pause.pause()?;
    let modified = capture_and_save("modified", save_modified)?;

    let delta = diff(&initial, &modified, filter);
    save_json(output, &delta)?;
    report_saved(&delta, output);
    Ok(())
}
