//! Applies close/run/restart actions described by a [`Delta`](psdelta_common::types::Delta)
//! against the live system.
mod apply;
mod confirm;
mod options;
mod processes;
mod report;
mod services;

pub use apply::{apply, Providers};
pub use confirm::{Confirmer, MockConfirmer};
pub use options::ApplyOptions;
pub use report::{ApplyReport, ItemReport, Operation, Outcome, Summary};
