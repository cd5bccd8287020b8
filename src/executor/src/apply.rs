use crate::confirm::Confirmer;
use crate::options::ApplyOptions;
use crate::report::ApplyReport;
use itertools::Itertools;
use psdelta_common::types::{Action, Delta, ProcessRecord, ServiceDelta, ServiceStatus, Snapshot};
use psdelta_extracts::provider::{
    ElevatedLauncher, ProcessProvider, ServiceProvider, TrustZoneRegistrar,
};
use std::collections::HashSet;
use std::fmt::Display;
use std::thread;
use tracing::{debug, info};

/// OS collaborators the executor acts through.
pub struct Providers<'a> {
    pub processes: &'a dyn ProcessProvider,
    pub services: &'a dyn ServiceProvider,
    pub elevation: &'a dyn ElevatedLauncher,
    pub trust_zone: &'a dyn TrustZoneRegistrar,
    pub confirmer: &'a dyn Confirmer,
}

/// Applies `actions`, in order, against the items of `delta`.
///
/// Nothing aborts the run: every operation is attempted independently and its
/// outcome recorded in the returned report. `baseline` seeds the set of running
/// executables consulted by once-only launches.
pub fn apply(
    delta: &Delta,
    actions: &[Action],
    options: &ApplyOptions,
    baseline: &Snapshot,
    providers: &Providers,
) -> ApplyReport {
    let mut executor = Executor::new(options, baseline, providers);
    for &action in actions {
        executor.run_action(delta, action);
    }
    executor.report.log_summary();
    executor.report
}

pub(crate) struct Executor<'a> {
    pub(crate) options: &'a ApplyOptions,
    pub(crate) providers: &'a Providers<'a>,
    pub(crate) report: ApplyReport,
    /// Executables of the baseline snapshot plus those launched during this run,
    /// minus those this run terminated.
    pub(crate) known_exes: HashSet<String>,
}

impl<'a> Executor<'a> {
    fn new(options: &'a ApplyOptions, baseline: &Snapshot, providers: &'a Providers<'a>) -> Self {
        let known_exes = baseline
            .processes
            .iter()
            .map(|process| process.exe_path.clone())
            .filter(|exe| !exe.is_empty())
            .collect();

        Self {
            options,
            providers,
            report: ApplyReport::default(),
            known_exes,
        }
    }

    fn run_action(&mut self, delta: &Delta, action: Action) {
        let revert = self.options.revert;
        info!(
            "Applying action {}{}",
            action,
            if revert { " (revert)" } else { "" }
        );

        match action {
            Action::Close => {
                let targets = if revert {
                    delta.services_before(ServiceStatus::Stopped)
                } else {
                    delta.services_after(ServiceStatus::Stopped)
                };
                self.stop_services(action, &targets);
                self.pause("after stopping services");

                let processes = if revert {
                    &delta.processes_started
                } else {
                    &delta.processes_terminated
                };
                for record in processes {
                    self.terminate(action, record);
                }
            }
            Action::Run => {
                let targets = if revert {
                    delta.services_before(ServiceStatus::Running)
                } else {
                    delta.services_after(ServiceStatus::Running)
                };
                self.start_services(action, &targets);
                self.pause("after starting services");

                let processes = if revert {
                    &delta.processes_terminated
                } else {
                    &delta.processes_started
                };
                for record in processes {
                    self.launch(action, record);
                }
            }
            Action::Restart => {
                let targets: Vec<&ServiceDelta> = delta.services.iter().collect();
                self.restart_services(action, &targets);
                self.pause("after restarting services");

                let processes: Vec<&ProcessRecord> = delta
                    .processes_started
                    .iter()
                    .chain(&delta.processes_terminated)
                    .unique_by(|record| record.uid())
                    .collect();
                for record in &processes {
                    self.terminate(action, record);
                }
                for record in &processes {
                    self.launch(action, record);
                }
            }
        }

        self.pause("before next action");
    }

    /// Sleeps for the configured delay, if any.
    pub(crate) fn pause(&self, reason: impl Display) {
        if self.options.delay_ms == 0 {
            return;
        }
        info!("Waiting for {} milliseconds {}.", self.options.delay_ms, reason);
        thread::sleep(self.options.delay());
    }

    /// Asks for confirmation when the run requires it.
    pub(crate) fn approved(&self, prompt: &str) -> bool {
        if !self.options.confirm {
            return true;
        }
        let approved = self.providers.confirmer.confirm(prompt);
        if !approved {
            debug!("Declined: {}", prompt);
        }
        approved
    }
}
