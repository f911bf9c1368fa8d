use crate::core::models::graph::MolecularGraph;
use petgraph::graph::NodeIndex;
use rustworkx_core::centrality::{
    betweenness_centrality as shortest_path_betweenness, closeness_centrality as reachable_closeness,
};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Node count from which betweenness fans out over rayon's pool.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 50;
#[cfg(not(feature = "parallel"))]
const PARALLEL_THRESHOLD: usize = usize::MAX;

/// Node-level centrality measures, indexed like [`MolecularGraph::nodes`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Centralities {
    pub degree: Vec<f64>,
    pub betweenness: Vec<f64>,
    pub closeness: Vec<f64>,
    pub clustering: Vec<f64>,
}

#[instrument(skip_all, name = "centrality_task")]
pub fn run(graph: &MolecularGraph) -> Centralities {
    debug!(nodes = graph.node_count(), "Computing node centralities.");
    Centralities {
        degree: degree_centrality(graph),
        betweenness: betweenness_centrality(graph),
        closeness: closeness_centrality(graph),
        clustering: clustering_coefficients(graph),
    }
}

/// `degree / (n - 1)`. A lone node scores 1.
pub fn degree_centrality(graph: &MolecularGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n == 1 {
        return vec![1.0];
    }
    let scale = 1.0 / (n.saturating_sub(1)) as f64;
    (0..n).map(|i| graph.degree(i) as f64 * scale).collect()
}

/// Shortest-path betweenness over unweighted hops, normalized by `(n - 1)(n - 2)`
/// so that a path's middle node on three vertices scores 1.
pub fn betweenness_centrality(graph: &MolecularGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 2 {
        return vec![0.0; n];
    }
    shortest_path_betweenness(graph.inner(), false, true, PARALLEL_THRESHOLD)
        .into_iter()
        .map(|score| score.unwrap_or(0.0))
        .collect()
}

/// Closeness restricted to the reachable set, with the Wasserman–Faust correction
/// `((r - 1) / (n - 1)) * ((r - 1) / Σd)` for `r` reachable nodes including the
/// node itself. Isolated nodes score 0.
pub fn closeness_centrality(graph: &MolecularGraph) -> Vec<f64> {
    if graph.node_count() < 2 {
        return vec![0.0; graph.node_count()];
    }
    reachable_closeness(graph.inner(), true)
        .into_iter()
        .map(|score| score.filter(|c| c.is_finite()).unwrap_or(0.0))
        .collect()
}

/// Local clustering coefficient: closed neighbor pairs over possible pairs.
pub fn clustering_coefficients(graph: &MolecularGraph) -> Vec<f64> {
    let inner = graph.inner();
    inner
        .node_indices()
        .map(|node| {
            let neighbors: HashSet<NodeIndex> = inner.neighbors(node).collect();
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }
            let links = neighbors
                .iter()
                .flat_map(|&a| inner.neighbors(a).filter(move |&b| a < b))
                .filter(|b| neighbors.contains(b))
                .count();
            2.0 * links as f64 / (k * (k - 1)) as f64
        })
        .collect()
}

/// Mean local clustering over all nodes (0 for an empty graph).
pub fn average_clustering(clustering: &[f64]) -> f64 {
    if clustering.is_empty() {
        0.0
    } else {
        clustering.iter().sum::<f64>() / clustering.len() as f64
    }
}
