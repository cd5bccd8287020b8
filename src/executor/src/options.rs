use std::time::Duration;

/// Knobs for a single [`apply`](crate::apply) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Pause after each operation, phase and action. Zero disables pacing.
    pub delay_ms: u64,
    /// Ask the [`Confirmer`](crate::Confirmer) before every operation.
    pub confirm: bool,
    /// Undo the recorded change instead of re-applying it.
    pub revert: bool,
    /// Retry a failed launch once with only the executable path.
    pub fallback_exe: bool,
    /// Launch with only the executable path, dropping recorded arguments.
    pub skip_cmdline: bool,
    /// Never start a second copy of an executable that is already running.
    pub once_only: bool,
}

impl ApplyOptions {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            confirm: false,
            revert: false,
            fallback_exe: true,
            skip_cmdline: false,
            once_only: false,
        }
    }
}
