use super::DialoguerConfirmer;
use anyhow::Result;
use psdelta_common::files::load_json;
use psdelta_common::filter::NameFilter;
use psdelta_common::types::{Action, Delta};
use psdelta_common::notice;
use psdelta_executor::{apply, ApplyOptions, Providers};
use psdelta_extracts::capture;
use psdelta_extracts::provider::{SysinfoProcesses, SystemElevation, SystemServices, SystemTrustZone};
use std::path::Path;
use tracing::info;

pub struct LoadArgs<'a> {
    pub input: &'a Path,
    pub actions: &'a [Action],
    pub filter: NameFilter,
    pub options: ApplyOptions,
}

pub fn load(args: LoadArgs) -> Result<()> {
    let delta: Delta = load_json(args.input)?;
    let delta = args.filter.apply_to_delta(&delta);
    if delta.is_empty() {
        info!("Nothing to do: the filtered delta is empty");
    }

    let processes = SysinfoProcesses::new();
    let services = SystemServices::new();
    let elevation = SystemElevation::new();
    let trust_zone = SystemTrustZone::new();
    let confirmer = DialoguerConfirmer;

    let baseline = capture(&processes, &services);

    let providers = Providers {
        processes: &processes,
        services: &services,
        elevation: &elevation,
        trust_zone: &trust_zone,
        confirmer: &confirmer,
    };
    let report = apply(&delta, args.actions, &args.options, &baseline, &providers);

    let summary = report.summary();
    notice::finished(summary, summary.failed);
    Ok(())
}
