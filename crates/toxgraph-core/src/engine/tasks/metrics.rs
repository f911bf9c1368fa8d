use super::centrality::{self, Centralities};
use super::community;
use crate::core::models::graph::{GraphNode, MolecularGraph};
use crate::engine::config::MetricsConfig;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub key: String,
    pub value: f64,
}

/// Distribution of one node-level metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetricSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Nodes within the tie tolerance of `max`, in node order.
    pub max_nodes: Vec<String>,
    /// Highest-scoring nodes, descending; ties keep node order.
    pub top: Vec<RankedNode>,
}

impl MetricSummary {
    /// Summarizes `(node_index, value)` entries. No entries yields the zeroed summary.
    fn from_entries(graph: &MolecularGraph, entries: &[(usize, f64)], config: &MetricsConfig) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let min = entries.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
        let max = entries.iter().map(|&(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
        let mean = entries.iter().map(|&(_, v)| v).sum::<f64>() / entries.len() as f64;
        let key_of = |i: usize| graph[i].key.clone();

        let max_nodes = entries
            .iter()
            .filter(|&&(_, v)| (max - v).abs() <= config.tie_tolerance)
            .map(|&(i, _)| key_of(i))
            .collect();

        let mut ranked = entries.to_vec();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let top = ranked
            .into_iter()
            .take(config.top_n)
            .map(|(i, value)| RankedNode { key: key_of(i), value })
            .collect();

        Self {
            min,
            max,
            mean,
            max_nodes,
            top,
        }
    }
}

/// Per-node values behind the summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub key: String,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub clustering: f64,
    /// `None` when the node has no same-chain neighbor with an integer residue number.
    pub seq_distance_avg: Option<f64>,
    pub long_contacts_prop: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CommunitySummary {
    pub community_count: usize,
    pub modularity: f64,
    pub communities: Vec<Vec<String>>,
}

/// Charge and hydrophobicity over a set of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PropertyAggregates {
    pub node_count: usize,
    pub total_charge: f64,
    pub charge_std: f64,
    pub hydrophobicity_mean: f64,
    pub hydrophobicity_std: f64,
}

impl PropertyAggregates {
    fn over<'a>(nodes: impl Iterator<Item = &'a GraphNode>) -> Self {
        let (charges, hydro): (Vec<f64>, Vec<f64>) =
            nodes.map(|n| (n.charge, n.hydrophobicity)).unzip();
        let (_, charge_std) = mean_and_std(&charges);
        let (hydrophobicity_mean, hydrophobicity_std) = mean_and_std(&hydro);
        Self {
            node_count: charges.len(),
            total_charge: charges.iter().sum(),
            charge_std,
            hydrophobicity_mean,
            hydrophobicity_std,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SurfaceStats {
    pub all: PropertyAggregates,
    pub surface: PropertyAggregates,
    /// Surface nodes over all nodes (0 for an empty graph).
    pub surface_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub average_clustering: f64,
    pub disulfide_count: usize,
    pub degree: MetricSummary,
    pub betweenness: MetricSummary,
    pub closeness: MetricSummary,
    pub clustering: MetricSummary,
    pub seq_distance_avg: MetricSummary,
    pub long_contacts_prop: MetricSummary,
    pub community: CommunitySummary,
    pub surface: SurfaceStats,
    pub pharmacophore_count: usize,
    pub nodes: Vec<NodeMetrics>,
    #[serde(skip)]
    pub centralities: Centralities,
}

/// `2E / (N(N - 1))`, or 0 when fewer than two nodes exist.
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    2.0 * edge_count as f64 / (node_count * (node_count - 1)) as f64
}

/// Computes every graph descriptor. An empty graph yields zeroed metrics.
#[instrument(skip_all, name = "metrics_task")]
pub fn run(graph: &MolecularGraph, config: &MetricsConfig) -> GraphMetrics {
    let n = graph.node_count();
    let centralities = centrality::run(graph);
    let sequence = sequence_descriptors(graph, config.long_contact_separation);

    let nodes: Vec<NodeMetrics> = graph
        .nodes()
        .enumerate()
        .map(|(i, node)| NodeMetrics {
            key: node.key.clone(),
            degree: centralities.degree[i],
            betweenness: centralities.betweenness[i],
            closeness: centralities.closeness[i],
            clustering: centralities.clustering[i],
            seq_distance_avg: sequence[i].map(|(avg, _)| avg),
            long_contacts_prop: sequence[i].map(|(_, prop)| prop),
        })
        .collect();

    let summarize = |values: &[f64]| {
        let entries: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
        MetricSummary::from_entries(graph, &entries, config)
    };
    let summarize_optional = |pick: fn(&NodeMetrics) -> Option<f64>| {
        let entries: Vec<(usize, f64)> = nodes
            .iter()
            .enumerate()
            .filter_map(|(i, m)| pick(m).map(|v| (i, v)))
            .collect();
        MetricSummary::from_entries(graph, &entries, config)
    };

    let communities = community::run(graph);
    let community = CommunitySummary {
        community_count: communities.community_count,
        modularity: communities.modularity,
        communities: communities
            .communities
            .iter()
            .map(|members| members.iter().map(|&i| graph[i].key.clone()).collect())
            .collect(),
    };

    let all = PropertyAggregates::over(graph.nodes());
    let surface = PropertyAggregates::over(graph.nodes().filter(|n| n.is_surface));
    let surface_ratio = if n == 0 {
        0.0
    } else {
        surface.node_count as f64 / n as f64
    };

    let metrics = GraphMetrics {
        node_count: n,
        edge_count: graph.edge_count(),
        density: density(n, graph.edge_count()),
        average_clustering: centrality::average_clustering(&centralities.clustering),
        disulfide_count: graph.attributes().disulfide_count,
        degree: summarize(&centralities.degree),
        betweenness: summarize(&centralities.betweenness),
        closeness: summarize(&centralities.closeness),
        clustering: summarize(&centralities.clustering),
        seq_distance_avg: summarize_optional(|m| m.seq_distance_avg),
        long_contacts_prop: summarize_optional(|m| m.long_contacts_prop),
        community,
        surface: SurfaceStats {
            all,
            surface,
            surface_ratio,
        },
        pharmacophore_count: graph.nodes().filter(|n| n.is_pharmacophore).count(),
        nodes,
        centralities,
    };

    info!(
        nodes = metrics.node_count,
        edges = metrics.edge_count,
        density = metrics.density,
        communities = metrics.community.community_count,
        "Graph metrics computed."
    );
    metrics
}

/// Per node: mean absolute residue-number gap to same-chain neighbors, and the
/// fraction of those gaps above `separation`. Nodes without an integer residue
/// number, or without an eligible neighbor, get `None`.
fn sequence_descriptors(graph: &MolecularGraph, separation: isize) -> Vec<Option<(f64, f64)>> {
    graph
        .nodes()
        .enumerate()
        .map(|(i, node)| {
            let own = node.residue_number.as_integer()?;
            let gaps: Vec<isize> = graph
                .neighbors(i)
                .into_iter()
                .filter_map(|j| {
                    let other = &graph[j];
                    if other.chain != node.chain {
                        return None;
                    }
                    other.residue_number.as_integer().map(|r| (r - own).abs())
                })
                .collect();
            if gaps.is_empty() {
                return None;
            }
            let count = gaps.len() as f64;
            let avg = gaps.iter().sum::<isize>() as f64 / count;
            let long = gaps.iter().filter(|&&g| g > separation).count() as f64 / count;
            Some((avg, long))
        })
        .collect()
}

/// Population mean and standard deviation; `(0, 0)` for no values.
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
