use super::{LaunchError, ProcessProvider};
use anyhow::{bail, Result};
use psdelta_common::types::ProcessRecord;
use std::process::{Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, Signal, System};
use tracing::{debug, trace};

#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Process access backed by `sysinfo`.
///
/// A single [`System`] is kept and refreshed on every listing, so repeated scans
/// during one batch do not pay for a full re-initialisation.
pub struct SysinfoProcesses {
    system: Mutex<System>,
}

impl SysinfoProcesses {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn system(&self) -> MutexGuard<'_, System> {
        // a panic while refreshing leaves the table usable
        self.system.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(process: &Process) -> ProcessRecord {
        ProcessRecord {
            name: process.name().to_string_lossy().to_string(),
            pid: process.pid().as_u32(),
            exe_path: process
                .exe()
                .map(|path| path.to_string_lossy().to_string())
                .unwrap_or_default(),
            cmdline: process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect(),
            create_time: process.start_time() as f64,
        }
    }
}

impl Default for SysinfoProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProvider for SysinfoProcesses {
    #[tracing::instrument(skip(self))]
    fn list_processes(&self) -> Vec<ProcessRecord> {
        let mut system = self.system();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );

        let mut records: Vec<ProcessRecord> = system
            .processes()
            .values()
            .filter(|process| process.thread_kind().is_none())
            .map(Self::record)
            .collect();
        records.sort_by_key(|record| record.pid);

        debug!("Enumerated {} processes", records.len());
        records
    }

    fn spawn(&self, command: &[String]) -> Result<u32, LaunchError> {
        let Some((program, args)) = command.split_first() else {
            return Err(LaunchError::Other {
                code: None,
                message: "empty command line".to_string(),
            });
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }

        let child = cmd
            .spawn()
            .map_err(|e| LaunchError::from_io(&e, program))?;
        trace!("Spawned {} with pid {}", program, child.id());
        Ok(child.id())
    }

    fn terminate(&self, process: &ProcessRecord) -> Result<()> {
        let pid = Pid::from_u32(process.pid);
        let mut system = self.system();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let Some(live) = system.process(pid) else {
            bail!("Process {} ({}) is no longer running", process.name, process.pid);
        };

        // SIGTERM where the platform has it, a hard kill otherwise
        let sent = live.kill_with(Signal::Term).unwrap_or_else(|| live.kill());
        if !sent {
            bail!(
                "Failed to signal process {} ({})",
                process.name,
                process.pid
            );
        }
        Ok(())
    }
}
