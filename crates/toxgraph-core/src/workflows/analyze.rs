use crate::core::models::graph::{GraphAttributes, GraphEdge, GraphNode, Granularity};
use crate::core::models::residue::ResidueNumber;
use crate::core::models::system::MolecularSystem;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::dipole::{self, ChargeAssignment, DipoleResult};
use crate::engine::tasks::disulfide::{self, DisulfideBridge};
use crate::engine::tasks::metrics::{self, GraphMetrics};
use crate::engine::tasks::motifs::{self, StructuralMotifs};
use crate::engine::tasks::segmentation::ResidueSegment;
use crate::engine::tasks::graph_build;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// Optional annotations supplied by external tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisInputs<'a> {
    /// Per-atom partial charges in structure atom order. Without them the dipole
    /// falls back to the residue charge table.
    pub charges: Option<&'a [f64]>,
    /// Solvent-accessible area per residue, in Å².
    pub sasa: Option<&'a HashMap<(char, ResidueNumber), f64>>,
    pub pharmacophores: Option<&'a HashSet<(char, ResidueNumber)>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub attributes: GraphAttributes,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Everything one analysis run produces for a structure.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub atom_count: usize,
    pub residue_count: usize,
    pub disulfide_bridges: Vec<DisulfideBridge>,
    pub motifs: StructuralMotifs,
    pub metrics: GraphMetrics,
    /// Empty unless the graph is atom-level.
    pub segments: Vec<ResidueSegment>,
    pub dipole: DipoleResult,
    pub graph: GraphExport,
}

/// Runs graph construction, metrics, segmentation and the dipole calculation.
///
/// # Errors
///
/// Returns [`EngineError::Input`] if the structure has no atoms,
/// [`EngineError::Config`] for invalid settings, and any dipole failure
/// (most notably a charge/atom count mismatch) unchanged.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(
    system: &MolecularSystem,
    config: &AnalysisConfig,
    inputs: AnalysisInputs,
    reporter: &ProgressReporter,
) -> Result<AnalysisReport, EngineError> {
    config.validate()?;
    if system.atom_count() == 0 {
        return Err(EngineError::Input("structure contains no atoms".to_string()));
    }
    info!(
        atoms = system.atom_count(),
        residues = system.residue_count(),
        granularity = %config.graph.granularity,
        "Starting structure analysis."
    );

    let mut graph = reporter.phase("Graph Construction", || {
        let mut graph = graph_build::run(system, &config.graph, reporter);
        if let Some(sasa) = inputs.sasa {
            graph_build::annotate_surface(&mut graph, sasa, config.metrics.surface_sasa_threshold);
        }
        if let Some(residues) = inputs.pharmacophores {
            graph_build::annotate_pharmacophores(&mut graph, residues);
        }
        reporter.report(Progress::Message(format!(
            "{} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        )));
        graph
    });

    let dipole = reporter.phase("Dipole Moment", || {
        let assignment = match inputs.charges {
            Some(per_atom) => ChargeAssignment::PerAtom(per_atom),
            None => ChargeAssignment::ResidueTable(&config.graph.properties),
        };
        dipole::run(system, assignment, &config.dipole)
    })?;
    dipole::attach_to_graph(&mut graph, &dipole);

    let metrics = reporter.phase("Graph Metrics", || metrics::run(&graph, &config.metrics));

    let segments = reporter.phase("Segmentation", || {
        if config.graph.granularity == Granularity::Atom {
            super::segment(&graph, &metrics)
        } else {
            Ok(Vec::new())
        }
    })?;

    let motifs = motifs::run(&graph);
    let disulfide_bridges = disulfide::find_bridges(system, config.graph.disulfide_max_distance);

    info!(
        nodes = metrics.node_count,
        edges = metrics.edge_count,
        disulfides = motifs.disulfide_bridges,
        cystine_knot = motifs.cystine_knot,
        dipole = dipole.magnitude,
        "Structure analysis complete."
    );

    Ok(AnalysisReport {
        atom_count: system.atom_count(),
        residue_count: system.residue_count(),
        disulfide_bridges,
        motifs,
        metrics,
        segments,
        dipole,
        graph: GraphExport {
            attributes: graph.attributes().clone(),
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().cloned().collect(),
        },
    })
}
