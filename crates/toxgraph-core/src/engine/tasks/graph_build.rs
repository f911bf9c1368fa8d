use super::disulfide::{self, DisulfideBridge};
use crate::core::models::graph::{EdgeKind, GraphNode, Granularity, MolecularGraph, node_key};
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::{Residue, ResidueNumber};
use crate::core::models::system::{ALPHA_CARBON_ATOM_NAME, MolecularSystem};
use crate::core::utils::geometry::distance;
use crate::core::utils::identifiers::{PEPTIDE_AMIDE_ATOM_NAME, PEPTIDE_CARBONYL_ATOM_NAME};
use crate::engine::config::GraphConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Builds the interaction graph of `system` at the configured granularity.
///
/// Edges come from three sources, collapsed to one edge per node pair:
/// every pair within `distance_threshold`, peptide links between consecutive
/// residues of a chain, and detected disulfide bridges. An empty selection yields
/// an empty graph.
///
/// The pairwise distance scan reports one task step per node through `reporter`.
#[instrument(skip_all, name = "graph_build_task")]
pub fn run(
    system: &MolecularSystem,
    config: &GraphConfig,
    reporter: &ProgressReporter,
) -> MolecularGraph {
    info!(
        granularity = %config.granularity,
        threshold = config.distance_threshold,
        "Building interaction graph."
    );
    let mut graph = MolecularGraph::new(config.granularity, config.distance_threshold);
    let atom_nodes = add_nodes(system, config, &mut graph);

    let bridges = disulfide::find_bridges(system, config.disulfide_max_distance);
    graph.set_disulfide_count(bridges.len());

    if graph.is_empty() {
        warn!("No atoms selected for graph construction; returning an empty graph.");
        return graph;
    }

    add_distance_edges(config, &mut graph, reporter);
    if config.include_peptide_bonds {
        add_peptide_edges(system, config, &atom_nodes, &mut graph);
    }
    if config.include_disulfides {
        add_disulfide_edges(system, config, &bridges, &atom_nodes, &mut graph);
    }
    mark_disulfide_residues(&bridges, &mut graph);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        disulfides = bridges.len(),
        "Graph construction complete."
    );
    graph
}

/// Flags nodes whose residue has a solvent-accessible area above `threshold`.
///
/// `sasa` is keyed by `(chain, residue_number)`; residues it does not list are
/// left unflagged.
pub fn annotate_surface(
    graph: &mut MolecularGraph,
    sasa: &HashMap<(char, ResidueNumber), f64>,
    threshold: f64,
) -> usize {
    let mut flagged = 0;
    for node in graph.nodes_mut() {
        node.is_surface = sasa
            .get(&node.residue_locator())
            .is_some_and(|&area| area > threshold);
        flagged += usize::from(node.is_surface);
    }
    debug!(flagged, threshold, "Annotated surface nodes.");
    flagged
}

/// Flags nodes belonging to the given pharmacophore residues.
///
/// Residues are addressed by `(chain, residue_number)`. Returns the number of
/// flagged nodes.
pub fn annotate_pharmacophores(
    graph: &mut MolecularGraph,
    residues: &HashSet<(char, ResidueNumber)>,
) -> usize {
    let mut flagged = 0;
    for node in graph.nodes_mut() {
        node.is_pharmacophore = residues.contains(&node.residue_locator());
        flagged += usize::from(node.is_pharmacophore);
    }
    debug!(flagged, "Annotated pharmacophore nodes.");
    flagged
}

fn add_nodes(
    system: &MolecularSystem,
    config: &GraphConfig,
    graph: &mut MolecularGraph,
) -> HashMap<AtomId, usize> {
    let selected: Vec<AtomId> = match config.granularity {
        Granularity::Atom => system.atoms_iter().map(|(id, _)| id).collect(),
        Granularity::Residue => {
            let mut missing = 0usize;
            let ids = system
                .residues_iter()
                .filter_map(|(residue_id, _)| {
                    let ca = system.alpha_carbon(residue_id);
                    missing += usize::from(ca.is_none());
                    ca
                })
                .collect();
            if missing > 0 {
                warn!(residues = missing, "Residues without a CA atom were left out of the graph.");
            }
            ids
        }
    };

    let mut atom_nodes = HashMap::with_capacity(selected.len());
    for atom_id in selected {
        let Some(atom) = system.atom(atom_id) else {
            continue;
        };
        let Some((chain, residue)) = system.atom_context(atom_id) else {
            continue;
        };
        let props = config.properties.properties(&residue.name);
        let (atom_name, charge) = match config.granularity {
            Granularity::Atom => {
                let charge = if atom.name == ALPHA_CARBON_ATOM_NAME {
                    props.charge
                } else {
                    0.0
                };
                (Some(atom.name.as_str()), charge)
            }
            Granularity::Residue => (None, props.charge),
        };
        let node = GraphNode {
            key: node_key(chain, &residue.name, residue.number, atom_name),
            chain,
            residue_name: residue.name.clone(),
            residue_number: residue.number,
            atom_name: atom_name.map(str::to_string),
            amino_acid: config.properties.one_letter(&residue.name),
            hydrophobicity: props.hydrophobicity,
            charge,
            position: atom.position,
            is_surface: false,
            is_in_disulfide: false,
            is_pharmacophore: false,
        };
        atom_nodes.insert(atom_id, graph.add_node(node));
    }
    atom_nodes
}

fn add_distance_edges(
    config: &GraphConfig,
    graph: &mut MolecularGraph,
    reporter: &ProgressReporter,
) {
    let positions: Vec<Point3<f64>> = graph.nodes().map(|n| n.position).collect();
    reporter.report(Progress::TaskStart {
        total_steps: positions.len() as u64,
    });
    let pairs = distance_pairs(&positions, config.distance_threshold, reporter);
    reporter.report(Progress::TaskFinish);
    debug!(pairs = pairs.len(), "Distance pairs within threshold.");
    for (a, b, length) in pairs {
        graph.add_edge(a, b, EdgeKind::Distance, length, config.strengths.distance, true);
    }
}

/// All index pairs `i < j` whose distance is at most `threshold`, in ascending order.
fn distance_pairs(
    positions: &[Point3<f64>],
    threshold: f64,
    reporter: &ProgressReporter,
) -> Vec<(usize, usize, f64)> {
    let n = positions.len();
    let scan = |i: usize| {
        let row = ((i + 1)..n)
            .filter_map(|j| {
                let d = distance(&positions[i], &positions[j]);
                (d <= threshold).then_some((i, j, d))
            })
            .collect::<Vec<_>>();
        reporter.report(Progress::TaskIncrement);
        row
    };

    #[cfg(not(feature = "parallel"))]
    let pairs = (0..n).flat_map(scan).collect();

    #[cfg(feature = "parallel")]
    let pairs = (0..n).into_par_iter().flat_map_iter(scan).collect();

    pairs
}

fn add_peptide_edges(
    system: &MolecularSystem,
    config: &GraphConfig,
    atom_nodes: &HashMap<AtomId, usize>,
    graph: &mut MolecularGraph,
) {
    let (from_atom, to_atom) = match config.granularity {
        Granularity::Atom => (PEPTIDE_CARBONYL_ATOM_NAME, PEPTIDE_AMIDE_ATOM_NAME),
        Granularity::Residue => (ALPHA_CARBON_ATOM_NAME, ALPHA_CARBON_ATOM_NAME),
    };

    let mut added = 0usize;
    for (_, chain) in system.chains_iter() {
        let residues: Vec<(ResidueId, &Residue)> = chain
            .residues()
            .iter()
            .filter_map(|&id| system.residue(id).map(|r| (id, r)))
            .filter(|(_, r)| r.residue_type.is_some())
            .collect();

        for ((_, prev), (_, next)) in residues.iter().tuple_windows() {
            if !sequentially_adjacent(prev.number, next.number) {
                continue;
            }
            let endpoints = prev
                .get_atom_id_by_name(from_atom)
                .zip(next.get_atom_id_by_name(to_atom))
                .and_then(|(a, b)| Some((*atom_nodes.get(&a)?, *atom_nodes.get(&b)?)));
            let Some((a, b)) = endpoints else {
                continue;
            };
            let within = distance(&graph[a].position, &graph[b].position)
                <= config.distance_threshold;
            if graph.add_edge(
                a,
                b,
                EdgeKind::Peptide,
                config.peptide_weight,
                config.strengths.peptide,
                within,
            ) {
                added += 1;
            }
        }
    }
    debug!(edges = added, "Added peptide edges.");
}

/// Consecutive in sequence: `n` then `n + 1`, or an insertion-code residue
/// following its parent number.
fn sequentially_adjacent(prev: ResidueNumber, next: ResidueNumber) -> bool {
    match next.seq - prev.seq {
        1 => true,
        0 => next.insertion_code.is_some() && next.insertion_code != prev.insertion_code,
        _ => false,
    }
}

fn add_disulfide_edges(
    system: &MolecularSystem,
    config: &GraphConfig,
    bridges: &[DisulfideBridge],
    atom_nodes: &HashMap<AtomId, usize>,
    graph: &mut MolecularGraph,
) {
    for bridge in bridges {
        let (atom_a, atom_b) = match config.granularity {
            Granularity::Atom => (Some(bridge.sulfurs.0), Some(bridge.sulfurs.1)),
            Granularity::Residue => (
                system.alpha_carbon(bridge.residues.0),
                system.alpha_carbon(bridge.residues.1),
            ),
        };
        let endpoints = atom_a
            .zip(atom_b)
            .and_then(|(a, b)| Some((*atom_nodes.get(&a)?, *atom_nodes.get(&b)?)));
        let Some((a, b)) = endpoints else {
            debug!(
                residue_a = %bridge.residue_number_a,
                residue_b = %bridge.residue_number_b,
                "Disulfide partners not present in the node set."
            );
            continue;
        };
        let within = distance(&graph[a].position, &graph[b].position)
            <= config.distance_threshold;
        graph.add_edge(
            a,
            b,
            EdgeKind::Disulfide,
            config.disulfide_weight,
            config.strengths.disulfide,
            within,
        );
    }
}

fn mark_disulfide_residues(bridges: &[DisulfideBridge], graph: &mut MolecularGraph) {
    let bonded: HashSet<(char, ResidueNumber)> =
        bridges.iter().flat_map(|b| b.locators()).collect();
    for node in graph.nodes_mut() {
        node.is_in_disulfide = bonded.contains(&node.residue_locator());
    }
}
