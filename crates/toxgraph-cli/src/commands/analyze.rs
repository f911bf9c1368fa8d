use super::{load_charges, load_structure};
use crate::cli::AnalyzeArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::Result;
use crate::utils::output::write_json;
use crate::utils::progress::CliProgressHandler;
use toxgraph::engine::progress::ProgressReporter;
use toxgraph::workflows::analyze::{self, AnalysisInputs};
use tracing::info;

pub fn run(args: AnalyzeArgs, progress: CliProgressHandler) -> Result<()> {
    let partial_config = PartialAnalysisConfig::load(args.config.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&CliOverrides {
        granularity: args.granularity,
        distance_threshold: args.threshold,
        properties: args.config.properties.as_deref(),
        set_values: &args.config.set_values,
        ..Default::default()
    })?;

    let system = load_structure(&args.io.input)?;
    let charges = load_charges(args.psf.as_deref())?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    info!("Invoking the analysis workflow...");
    let report = analyze::run(
        &system,
        &config,
        AnalysisInputs {
            charges: charges.as_deref(),
            ..Default::default()
        },
        &reporter,
    )?;

    info!(
        "Graph has {} nodes and {} edges; {} disulfide bridge(s), cystine knot: {}.",
        report.metrics.node_count,
        report.metrics.edge_count,
        report.motifs.disulfide_bridges,
        report.motifs.cystine_knot
    );
    write_json(&report, args.io.output.as_deref())
}
