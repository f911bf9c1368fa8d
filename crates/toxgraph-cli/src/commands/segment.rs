use super::load_structure;
use crate::cli::SegmentArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::Result;
use crate::utils::output::write_json;
use toxgraph::core::models::graph::Granularity;
use toxgraph::workflows;
use tracing::info;

pub fn run(args: SegmentArgs) -> Result<()> {
    let config = PartialAnalysisConfig::load(args.config.config.as_deref())?.merge_with_cli(
        &CliOverrides {
            granularity: Some(Granularity::Atom),
            distance_threshold: args.threshold,
            properties: args.config.properties.as_deref(),
            set_values: &args.config.set_values,
            ..Default::default()
        },
    )?;

    let system = load_structure(&args.io.input)?;
    let graph = workflows::build_graph_with(&system, &config.graph);
    let metrics = workflows::compute_metrics_with(&graph, &config.metrics)?;
    let segments = workflows::segment(&graph, &metrics)?;

    info!("Produced {} residue segment(s).", segments.len());
    write_json(&segments, args.io.output.as_deref())
}
