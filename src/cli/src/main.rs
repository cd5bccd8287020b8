use anyhow::Context;
use psdelta::process_command::process_cli;
use std::process::ExitCode;

pub fn main() -> anyhow::Result<ExitCode> {
    process_cli().context("Can't process CLI command")
}
