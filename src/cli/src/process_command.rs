use crate::commands::{normalize_args, resolve_fallback_exe, Cli, Command};
use crate::config::ConfigLoader;
use crate::handlers::{self, build_filter, LoadArgs, SnapshotPause};
use crate::logging::setup_logging;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use psdelta_common::notice;
use psdelta_executor::ApplyOptions;
use std::path::PathBuf;
use std::process::ExitCode;

/// Parses the process arguments and runs the selected command.
pub fn process_cli() -> Result<ExitCode> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let Some(command) = cli.command else {
        notice::error("No command provided.");
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("Use -h for help.");
        return Ok(ExitCode::FAILURE);
    };

    let config = ConfigLoader::load_config(cli.config.as_deref())?;
    let log_file = cli
        .log_file
        .or_else(|| config.log_file.as_ref().map(PathBuf::from));
    setup_logging(cli.verbose, log_file.as_deref())?;

    match command {
        Command::Save { output } => handlers::save(&output)?,
        Command::Compare {
            snapshot1,
            snapshot2,
            output,
            filter,
        } => handlers::compare(
            &snapshot1,
            &snapshot2,
            &output,
            &build_filter(&filter, &config),
        )?,
        Command::Delta {
            output,
            save_initial,
            save_modified,
            wait,
            delay,
            filter,
        } => handlers::delta(
            &output,
            save_initial.as_deref(),
            save_modified.as_deref(),
            SnapshotPause::from_args(wait, delay),
            &build_filter(&filter, &config),
        )?,
        Command::Load {
            input,
            actions,
            delay,
            filter,
            confirm,
            revert,
            fallback_exe,
            no_fallback_exe,
            skip_cmdline,
            once_only,
        } => {
            let options = ApplyOptions {
                delay_ms: delay.unwrap_or(config.delay_ms),
                confirm,
                revert,
                fallback_exe: resolve_fallback_exe(fallback_exe, no_fallback_exe, config.fallback_exe),
                skip_cmdline: skip_cmdline || config.skip_cmdline,
                once_only: once_only || config.once_only,
            };
            handlers::load(LoadArgs {
                input: &input,
                actions: &actions,
                filter: build_filter(&filter, &config),
                options,
            })?
        }
    }

    Ok(ExitCode::SUCCESS)
}
