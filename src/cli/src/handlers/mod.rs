mod compare;
mod confirm;
mod delta;
mod load;
mod save;

pub use compare::compare;
pub use confirm::DialoguerConfirmer;
pub use delta::{delta, SnapshotPause};
pub use load::{load, LoadArgs};
pub use save::save;

use crate::commands::FilterArgs;
use crate::config::Config;
use psdelta_common::filter::NameFilter;

/// Command-line patterns merged with the configured ones.
pub(crate) fn build_filter(args: &FilterArgs, config: &Config) -> NameFilter {
    let include: Vec<&str> = args
        .include
        .iter()
        .chain(&config.include)
        .map(String::as_str)
        .collect();
    let exclude: Vec<&str> = args
        .exclude
        .iter()
        .chain(&config.exclude)
        .map(String::as_str)
        .collect();
    NameFilter::new(include.as_slice(), exclude.as_slice())
}
