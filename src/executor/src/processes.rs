use crate::apply::Executor;
use crate::report::{Operation, Outcome};
use psdelta_common::types::{Action, ProcessRecord};
use psdelta_extracts::provider::LaunchError;
use tracing::{error, info, warn};

impl Executor<'_> {
    /// Terminates every live process running the record's exact command.
    pub(crate) fn terminate(&mut self, action: Action, record: &ProcessRecord) {
        let outcome = self.terminate_matches(record);
        // other live instances are still caught by the launch-time scan
        if outcome == Outcome::Completed {
            self.known_exes.remove(&record.exe_path);
        }
        self.report
            .record(action, Operation::Terminate, target(record), outcome);
    }

    pub(crate) fn launch(&mut self, action: Action, record: &ProcessRecord) {
        let outcome = self.launch_record(record);
        if outcome == Outcome::Completed && !record.exe_path.is_empty() {
            self.known_exes.insert(record.exe_path.clone());
        }
        self.report
            .record(action, Operation::Launch, target(record), outcome);
    }

    fn terminate_matches(&self, record: &ProcessRecord) -> Outcome {
        let matches: Vec<ProcessRecord> = self
            .providers
            .processes
            .list_processes()
            .into_iter()
            .filter(|live| live.same_invocation(record))
            .collect();

        if matches.is_empty() {
            info!("Process {} is not running.", record.name);
            return Outcome::NotRunning;
        }

        let mut terminated = 0;
        let mut failures = Vec::new();
        for live in &matches {
            let prompt = format!(
                "Do you want to terminate process {} (PID {})?",
                live.name, live.pid
            );
            if !self.approved(&prompt) {
                continue;
            }

            match self.providers.processes.terminate(live) {
                Ok(()) => {
                    info!("Terminated process {} (PID {}).", live.name, live.pid);
                    terminated += 1;
                }
                Err(e) => {
                    error!(
                        "Could not terminate process {} (PID {}): {:#}",
                        live.name, live.pid, e
                    );
                    failures.push(format!("PID {}: {:#}", live.pid, e));
                }
            }
            self.pause(format_args!("after terminating process {}", live.name));
        }

        if !failures.is_empty() {
            Outcome::Failed(failures.join("; "))
        } else if terminated == 0 {
            Outcome::Declined
        } else {
            Outcome::Completed
        }
    }

    fn launch_record(&self, record: &ProcessRecord) -> Outcome {
        let command = if self.options.skip_cmdline {
            vec![record.exe_path.clone()]
        } else {
            record.cmdline.clone()
        };

        if command.first().map_or(true, |program| program.is_empty()) {
            info!("Process {} has no command line, skipping.", record.name);
            return Outcome::Skipped("empty command line".to_string());
        }

        let live = self.providers.processes.list_processes();

        if self.options.once_only && !record.exe_path.is_empty() {
            let running = self.known_exes.contains(&record.exe_path)
                || live.iter().any(|process| process.exe_path == record.exe_path);
            if running {
                info!(
                    "Executable {} is already running, skipping (once-only).",
                    record.exe_path
                );
                return Outcome::Skipped("executable already running".to_string());
            }
        }

        if live.iter().any(|process| process.same_invocation(record)) {
            info!("Process {} is already running.", record.name);
            return Outcome::Skipped("already running".to_string());
        }

        if !self.approved(&format!(
            "Do you want to start process {}?",
            command.join(" ")
        )) {
            return Outcome::Declined;
        }

        let outcome = self.launch_command(record, &command);
        if !outcome.is_failure() || !self.should_retry_with_exe(record, &command) {
            return outcome;
        }

        info!("Retrying {} with the executable only.", record.name);
        self.launch_command(record, std::slice::from_ref(&record.exe_path))
    }

    fn should_retry_with_exe(&self, record: &ProcessRecord, command: &[String]) -> bool {
        self.options.fallback_exe
            && !self.options.skip_cmdline
            && !record.exe_path.is_empty()
            && command != std::slice::from_ref(&record.exe_path)
    }

    /// One launch attempt, including the elevated retry and zone diagnosis.
    fn launch_command(&self, record: &ProcessRecord, command: &[String]) -> Outcome {
        let line = command.join(" ");

        let error = match self.providers.processes.spawn(command) {
            Ok(pid) => return self.verify_started(record, &line, pid),
            Err(error) => error,
        };

        match error {
            LaunchError::PermissionDenied => {
                warn!("Starting {} requires elevation, retrying elevated.", line);
                match self.providers.elevation.run_elevated(command) {
                    Ok(()) => {
                        info!("Started process {} with elevation.", line);
                        Outcome::Completed
                    }
                    Err(e) => {
                        error!("Could not start process {} elevated: {}", line, e);
                        Outcome::Failed(format!("elevated launch failed: {}", e))
                    }
                }
            }
            LaunchError::PathUnreachable { host: Some(host) } => {
                warn!("Network path for {} is blocked or unreachable.", line);
                self.offer_zone_fix(&host);
                Outcome::Failed(format!("network path on {} is unreachable", host))
            }
            LaunchError::PathUnreachable { host: None } => {
                warn!(
                    "Could not start process {}: network path is unreachable. Check the share and your connection.",
                    line
                );
                Outcome::Failed("network path is unreachable".to_string())
            }
            other => {
                error!("Could not start process {}: {}", line, other);
                Outcome::Failed(other.to_string())
            }
        }
    }

    fn verify_started(&self, record: &ProcessRecord, line: &str, pid: u32) -> Outcome {
        info!("Started process {} (PID {}).", line, pid);
        self.pause(format_args!("after starting process {}", line));

        if record.exe_path.is_empty() {
            return Outcome::Completed;
        }

        let present = self
            .providers
            .processes
            .list_processes()
            .iter()
            .any(|process| process.exe_path == record.exe_path);
        if present {
            Outcome::Completed
        } else {
            warn!("Process {} exited right after launch.", line);
            Outcome::Failed("not running after launch".to_string())
        }
    }

    /// The trust zone is only touched after an explicit yes.
    fn offer_zone_fix(&self, host: &str) {
        if !self.options.confirm {
            warn!(
                "If {} is a trusted file server, add it to the Local intranet zone \
                 (rerun with --confirm to do this automatically).",
                host
            );
            return;
        }

        let prompt = format!("Add {} to the Local intranet zone so programs on it can run?", host);
        if !self.providers.confirmer.confirm(&prompt) {
            return;
        }
        match self.providers.trust_zone.register_trusted_host(host) {
            Ok(()) => info!("Added {} to the Local intranet zone. Retry the launch.", host),
            Err(e) => error!("Could not add {} to the Local intranet zone: {:#}", host, e),
        }
    }
}

fn target(record: &ProcessRecord) -> String {
    let line = record.command_line();
    if line.is_empty() {
        record.name.clone()
    } else {
        line
    }
}
