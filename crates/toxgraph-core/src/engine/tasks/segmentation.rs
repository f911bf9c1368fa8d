use super::centrality::Centralities;
use crate::core::models::graph::{Granularity, MolecularGraph};
use crate::core::models::residue::ResidueNumber;
use crate::engine::error::EngineError;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// What `internal_edge_count` actually counts for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivitySource {
    /// Edges with both ends inside the residue.
    Internal,
    /// No internal edge exists; the value is the summed graph degree of the
    /// residue's atoms.
    DegreeProxy,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CentralityMeans {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub clustering: f64,
}

/// Per-residue summary of an atom-level graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueSegment {
    pub segment_id: String,
    pub chain: char,
    pub residue_name: String,
    pub residue_number: ResidueNumber,
    /// Node keys of the residue's atoms, in graph order.
    pub atom_keys: Vec<String>,
    pub atom_count: usize,
    pub internal_edge_count: usize,
    pub connectivity_source: ConnectivitySource,
    pub density: f64,
    pub degree_avg: f64,
    pub degree_min: usize,
    pub degree_max: usize,
    pub centrality_means: CentralityMeans,
    /// Other residues bonded to this one, as distinct `NAME:NUMBER` strings in
    /// lexical order. The chain is not part of the label.
    pub external_residues: Vec<String>,
}

/// Groups atom nodes into residues and aggregates their connectivity.
///
/// Segments are ordered by chain, then by residue number with insertion-code
/// residues after every plain number of the same chain.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedGranularity`] for residue-level graphs and
/// [`EngineError::Internal`] if `centralities` was computed for another graph.
#[instrument(skip_all, name = "segmentation_task")]
pub fn run(
    graph: &MolecularGraph,
    centralities: &Centralities,
) -> Result<Vec<ResidueSegment>, EngineError> {
    let granularity = graph.attributes().granularity;
    if granularity != Granularity::Atom {
        return Err(EngineError::UnsupportedGranularity(granularity));
    }
    let n = graph.node_count();
    let lengths = [
        centralities.degree.len(),
        centralities.betweenness.len(),
        centralities.closeness.len(),
        centralities.clustering.len(),
    ];
    if lengths.iter().any(|&len| len != n) {
        return Err(EngineError::Internal(format!(
            "centralities cover {:?} nodes but the graph has {}",
            lengths, n
        )));
    }

    let mut group_index: HashMap<(char, ResidueNumber), usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, node) in graph.nodes().enumerate() {
        let slot = *group_index.entry(node.residue_locator()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    let mut segments: Vec<ResidueSegment> = groups
        .iter()
        .map(|members| build_segment(graph, centralities, members))
        .collect();
    segments.sort_by_key(|s| {
        let number = s.residue_number;
        (s.chain, number.as_integer().is_none(), number)
    });

    debug!(segments = segments.len(), "Residue segmentation complete.");
    Ok(segments)
}

fn build_segment(
    graph: &MolecularGraph,
    centralities: &Centralities,
    members: &[usize],
) -> ResidueSegment {
    let first = &graph[members[0]];
    let locator = first.residue_locator();
    let k = members.len();
    let n = graph.node_count();

    let internal = members
        .iter()
        .flat_map(|&a| graph.neighbors(a).into_iter().map(move |b| (a, b)))
        .filter(|&(a, b)| a < b && graph[b].residue_locator() == locator)
        .count();

    let degrees: Vec<usize> = members.iter().map(|&i| graph.degree(i)).collect();
    let degree_sum: usize = degrees.iter().sum();

    let (internal_edge_count, connectivity_source, density) = if internal > 0 {
        let pairs = (k * (k - 1) / 2) as f64;
        (internal, ConnectivitySource::Internal, internal as f64 / pairs)
    } else {
        let density = if n > 1 {
            degree_sum as f64 / (k * (n - 1)) as f64
        } else {
            0.0
        };
        (degree_sum, ConnectivitySource::DegreeProxy, density)
    };

    let mean_of = |values: &[f64]| members.iter().map(|&i| values[i]).sum::<f64>() / k as f64;

    // Residues of other chains that share a name and number collapse to one entry.
    let external: BTreeSet<String> = members
        .iter()
        .flat_map(|&a| graph.neighbors(a))
        .map(|b| &graph[b])
        .filter(|other| other.residue_locator() != locator)
        .map(|other| format!("{}:{}", other.residue_name, other.residue_number))
        .collect();

    ResidueSegment {
        segment_id: format!("{}:{}", locator.0, locator.1),
        chain: first.chain,
        residue_name: first.residue_name.clone(),
        residue_number: first.residue_number,
        atom_keys: members.iter().map(|&i| graph[i].key.clone()).collect(),
        atom_count: k,
        internal_edge_count,
        connectivity_source,
        density,
        degree_avg: degree_sum as f64 / k as f64,
        degree_min: degrees.iter().copied().min().unwrap_or(0),
        degree_max: degrees.iter().copied().max().unwrap_or(0),
        centrality_means: CentralityMeans {
            degree: mean_of(&centralities.degree),
            betweenness: mean_of(&centralities.betweenness),
            closeness: mean_of(&centralities.closeness),
            clustering: mean_of(&centralities.clustering),
        },
        external_residues: external.into_iter().collect(),
    }
}
