use super::load_structure;
use crate::cli::DisulfidesArgs;
use crate::error::{CliError, Result};
use crate::utils::output::write_json;
use serde::Serialize;
use toxgraph::engine::config::DEFAULT_DISULFIDE_MAX_DISTANCE;
use toxgraph::engine::tasks::disulfide::{self, DisulfideBridge};
use toxgraph::engine::tasks::motifs;
use tracing::info;

#[derive(Serialize)]
struct DisulfideReport {
    max_distance: f64,
    bridges: Vec<DisulfideBridge>,
    disulfide_residues: usize,
    cystine_knot: bool,
}

pub fn run(args: DisulfidesArgs) -> Result<()> {
    let max_distance = args.max_distance.unwrap_or(DEFAULT_DISULFIDE_MAX_DISTANCE);
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(CliError::Argument(format!(
            "--max-distance must be a positive number, got {}",
            max_distance
        )));
    }

    let system = load_structure(&args.io.input)?;
    let bridges = disulfide::find_bridges(&system, max_distance);
    let disulfide_residues = bridges
        .iter()
        .flat_map(|bridge| bridge.locators())
        .collect::<std::collections::HashSet<_>>()
        .len();

    info!("Found {} disulfide bridge(s).", bridges.len());
    let report = DisulfideReport {
        max_distance,
        cystine_knot: motifs::detect_cystine_knot(bridges.len(), disulfide_residues),
        bridges,
        disulfide_residues,
    };
    write_json(&report, args.io.output.as_deref())
}
