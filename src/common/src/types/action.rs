use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Corrective action applied against a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Stop services and terminate processes
    Close,
    /// Start services and launch processes
    Run,
    /// Restart services, then terminate and relaunch processes
    Restart,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Close => write!(f, "close"),
            Action::Run => write!(f, "run"),
            Action::Restart => write!(f, "restart"),
        }
    }
}
