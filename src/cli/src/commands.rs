use clap::{Args, Parser, Subcommand};
use psdelta_common::types::Action;
use std::ffi::OsString;
use std::path::PathBuf;

const ABOUT: &str = "Process Delta Tool: capture snapshots of running processes and services, \
compare them, and stop, start or restart whatever changed in between.";

const EXAMPLES: &str = "\
Examples:
  Record what changes while you start or stop applications:
    psdelta delta -o delta.json --wait

  Close the processes and stop the services that appeared, pausing 2000 ms between steps:
    psdelta load -i delta.json -a close -d 2000

  Undo the recorded change instead:
    psdelta load -i delta.json -a close --revert

  Restrict to one application:
    psdelta load -i vpn_delta.json -a close --include \"ExpressVPN*\"

  Snapshot, adjust the system by hand, then diff:
    psdelta save -o startup.json
    psdelta save -o optimized.json
    psdelta compare -s1 startup.json -s2 optimized.json -o optimization.json

  Or in one step:
    psdelta delta -o optimization.json --wait --save-initial startup.json --save-modified optimized.json";

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "psdelta",
    about = ABOUT,
    version,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Enable debug output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[clap(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file (defaults to ./psdelta.toml when present)
    #[clap(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Include/exclude patterns shared by the commands that filter.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only act on processes/services whose name matches one of these globs
    #[clap(long, num_args = 1.., value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip processes/services whose name matches one of these globs
    #[clap(long, num_args = 1.., value_name = "PATTERN")]
    pub exclude: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Save a snapshot of current processes and services
    Save {
        /// Output snapshot file
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Compare two snapshots and write the delta
    Compare {
        /// First (earlier) snapshot file
        #[clap(long = "snapshot1", alias = "s1", value_name = "FILE")]
        snapshot1: PathBuf,

        /// Second (later) snapshot file
        #[clap(long = "snapshot2", alias = "s2", value_name = "FILE")]
        snapshot2: PathBuf,

        /// Output delta file
        #[clap(short, long)]
        output: PathBuf,

        #[clap(flatten)]
        filter: FilterArgs,
    },

    /// Capture a snapshot, wait, capture another and write the delta
    Delta {
        /// Output delta file
        #[clap(short, long)]
        output: PathBuf,

        /// File to save the initial snapshot to
        #[clap(long, value_name = "FILE")]
        save_initial: Option<PathBuf>,

        /// File to save the modified snapshot to
        #[clap(long, value_name = "FILE")]
        save_modified: Option<PathBuf>,

        /// Wait for Enter between the two snapshots
        #[clap(long, conflicts_with = "delay")]
        wait: bool,

        /// Seconds to wait between the two snapshots
        #[clap(long, value_name = "SECONDS")]
        delay: Option<u64>,

        #[clap(flatten)]
        filter: FilterArgs,
    },

    /// Load a delta and perform actions on it
    Load {
        /// Input delta file
        #[clap(short, long)]
        input: PathBuf,

        /// Actions to perform, in order
        #[clap(short, long, num_args = 1.., required = true, value_enum)]
        actions: Vec<Action>,

        /// Delay between operations in milliseconds
        #[clap(short, long, value_name = "MS")]
        delay: Option<u64>,

        #[clap(flatten)]
        filter: FilterArgs,

        /// Prompt before every operation
        #[clap(long)]
        confirm: bool,

        /// Revert the change captured in the delta
        #[clap(long)]
        revert: bool,

        /// Retry a failed launch with the bare executable
        #[clap(long, overrides_with = "no_fallback_exe")]
        fallback_exe: bool,

        /// Never retry a failed launch with the bare executable
        #[clap(long, overrides_with = "fallback_exe")]
        no_fallback_exe: bool,

        /// Launch processes without their recorded arguments
        #[clap(long)]
        skip_cmdline: bool,

        /// Do not launch an executable that is already running
        #[clap(long)]
        once_only: bool,
    },
}

/// Resolves the `--fallback-exe`/`--no-fallback-exe` pair against the configured default.
pub fn resolve_fallback_exe(fallback_exe: bool, no_fallback_exe: bool, configured: bool) -> bool {
    match (fallback_exe, no_fallback_exe) {
        (_, true) => false,
        (true, false) => true,
        (false, false) => configured,
    }
}

/// Global options that take a separate value, skipped when looking for the subcommand.
const GLOBAL_VALUE_OPTIONS: [&str; 2] = ["--log-file", "--config"];

/// Rewrites the two-letter short forms `-s1`/`-s2` of `compare` to their long
/// aliases so they parse as written. Arguments of other subcommands and anything
/// after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let Some(position) = subcommand_position(&args).filter(|&i| args[i] == "compare") else {
        return args;
    };

    for arg in args
        .iter_mut()
        .skip(position + 1)
        .take_while(|arg| arg.as_os_str() != "--")
    {
        let long = match arg.to_str() {
            Some("-s1") => "--s1",
            Some("-s2") => "--s2",
            _ => continue,
        };
        *arg = OsString::from(long);
    }
    args
}

fn subcommand_position(args: &[OsString]) -> Option<usize> {
    let mut skip_value = false;
    for (i, arg) in args.iter().enumerate().skip(1) {
        if skip_value {
            skip_value = false;
            continue;
        }
        match arg.to_str() {
            Some(text) if text.starts_with('-') => {
                skip_value = GLOBAL_VALUE_OPTIONS.contains(&text);
            }
            _ => return Some(i),
        }
    }
    None
}
