use crate::core::io::pdb::PdbFile;
use crate::core::io::scratch::read_structure_bytes;
use crate::core::models::graph::{Granularity, MolecularGraph};
use crate::core::models::system::MolecularSystem;
use crate::core::properties::registry::ResiduePropertyTable;
use crate::engine::config::{DipoleConfig, GraphConfig, GraphConfigBuilder, MetricsConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::dipole::{self, ChargeAssignment, DipoleResult};
use crate::engine::tasks::metrics::{self, GraphMetrics};
use crate::engine::tasks::segmentation::{self, ResidueSegment};
use crate::engine::tasks::graph_build;
use tracing::{debug, instrument};

const PDB_SUFFIX: &str = ".pdb";

/// Parses raw PDB bytes into a structure.
///
/// The bytes pass through a temporary file that is removed before this returns.
#[instrument(skip_all, name = "load_structure_workflow")]
pub fn load_structure(bytes: &[u8]) -> Result<MolecularSystem, EngineError> {
    read_structure_bytes::<PdbFile>(bytes, PDB_SUFFIX).map_err(|e| EngineError::Input(e.to_string()))
}

/// Builds a graph with default edge rules at the given granularity and threshold.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when `distance_threshold` is not a positive,
/// finite number. An empty structure is not an error; it yields an empty graph.
pub fn build_graph(
    system: &MolecularSystem,
    granularity: Granularity,
    distance_threshold: f64,
) -> Result<MolecularGraph, EngineError> {
    let config = GraphConfigBuilder::new()
        .granularity(granularity)
        .distance_threshold(distance_threshold)
        .build()?;
    Ok(build_graph_with(system, &config))
}

pub fn build_graph_with(system: &MolecularSystem, config: &GraphConfig) -> MolecularGraph {
    graph_build::run(system, config, &ProgressReporter::new())
}

pub fn compute_metrics(graph: &MolecularGraph) -> GraphMetrics {
    metrics::run(graph, &MetricsConfig::default())
}

pub fn compute_metrics_with(
    graph: &MolecularGraph,
    config: &MetricsConfig,
) -> Result<GraphMetrics, EngineError> {
    config.validate()?;
    Ok(metrics::run(graph, config))
}

/// Dipole with default settings: per-atom `charges` when given, otherwise the
/// built-in residue charge table.
pub fn compute_dipole(
    system: &MolecularSystem,
    charges: Option<&[f64]>,
) -> Result<DipoleResult, EngineError> {
    compute_dipole_with(
        system,
        charges,
        &ResiduePropertyTable::builtin(),
        &DipoleConfig::default(),
    )
}

pub fn compute_dipole_with(
    system: &MolecularSystem,
    charges: Option<&[f64]>,
    properties: &ResiduePropertyTable,
    config: &DipoleConfig,
) -> Result<DipoleResult, EngineError> {
    let assignment = match charges {
        Some(per_atom) => ChargeAssignment::PerAtom(per_atom),
        None => ChargeAssignment::ResidueTable(properties),
    };
    dipole::run(system, assignment, config)
}

/// Residue segments of an atom-level graph, using centralities already computed
/// in `metrics`. Residue-level graphs have no segments.
pub fn segment(
    graph: &MolecularGraph,
    metrics: &GraphMetrics,
) -> Result<Vec<ResidueSegment>, EngineError> {
    match segmentation::run(graph, &metrics.centralities) {
        Err(EngineError::UnsupportedGranularity(granularity)) => {
            debug!(%granularity, "Skipping segmentation for a non-atom graph.");
            Ok(Vec::new())
        }
        other => other,
    }
}
