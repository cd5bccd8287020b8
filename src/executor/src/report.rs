use psdelta_common::types::Action;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StopService,
    StartService,
    RestartService,
    Terminate,
    Launch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Operation::StopService => "stop service",
            Operation::StartService => "start service",
            Operation::RestartService => "restart service",
            Operation::Terminate => "terminate",
            Operation::Launch => "launch",
        };
        write!(f, "{}", label)
    }
}

/// Result of one operation on one delta item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The service was already in the requested state.
    AlreadyInState,
    /// No live process matched the record.
    NotRunning,
    Skipped(String),
    Declined,
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::AlreadyInState => write!(f, "already in state"),
            Outcome::NotRunning => write!(f, "not running"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Declined => write!(f, "declined"),
            Outcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub action: Action,
    pub operation: Operation,
    /// Service name or command line the operation was aimed at.
    pub target: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub declined: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} completed, {} unchanged, {} skipped, {} declined, {} failed",
            self.completed, self.unchanged, self.skipped, self.declined, self.failed
        )
    }
}

/// Every operation attempted during a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    items: Vec<ItemReport>,
}

impl ApplyReport {
    pub(crate) fn record(
        &mut self,
        action: Action,
        operation: Operation,
        target: impl Into<String>,
        outcome: Outcome,
    ) {
        self.items.push(ItemReport {
            action,
            operation,
            target: target.into(),
            outcome,
        });
    }

    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| item.outcome.is_failure())
    }

    pub fn summary(&self) -> Summary {
        self.items
            .iter()
            .fold(Summary::default(), |mut summary, item| {
                match item.outcome {
                    Outcome::Completed => summary.completed += 1,
                    Outcome::AlreadyInState | Outcome::NotRunning => summary.unchanged += 1,
                    Outcome::Skipped(_) => summary.skipped += 1,
                    Outcome::Declined => summary.declined += 1,
                    Outcome::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }

    pub fn log_summary(&self) {
        for item in self.failures() {
            info!("{} {} {}: {}", item.action, item.operation, item.target, item.outcome);
        }
        info!("Applied {} operations: {}", self.items.len(), self.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut report = ApplyReport::default();
        report.record(Action::Close, Operation::StopService, "Spooler", Outcome::Completed);
        report.record(Action::Close, Operation::StopService, "BITS", Outcome::AlreadyInState);
        report.record(Action::Close, Operation::Terminate, "a.exe", Outcome::NotRunning);
        report.record(Action::Run, Operation::Launch, "b.exe", Outcome::Failed("gone".into()));
        report.record(Action::Run, Operation::Launch, "c.exe", Outcome::Declined);

        assert_eq!(
            report.summary(),
            Summary {
                completed: 1,
                unchanged: 2,
                skipped: 0,
                declined: 1,
                failed: 1,
            }
        );
        assert_eq!(report.failures().count(), 1);
        assert_eq!(
            report.summary().to_string(),
            "1 completed, 2 unchanged, 0 skipped, 1 declined, 1 failed"
        );
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Skipped("once-only".into()).to_string(), "skipped (once-only)");
        assert_eq!(Outcome::Failed("code 5".into()).to_string(), "failed (code 5)");
    }
}
