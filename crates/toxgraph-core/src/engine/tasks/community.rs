use crate::core::models::graph::MolecularGraph;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Partition of the graph's nodes found by greedy modularity maximization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommunityStructure {
    pub community_count: usize,
    pub modularity: f64,
    /// Node indices per community, largest community first.
    pub communities: Vec<Vec<usize>>,
}

/// Agglomerative modularity maximization (Clauset–Newman–Moore) on the
/// unweighted graph.
///
/// Starting from singletons, the pair of adjacent communities with the largest
/// modularity gain is merged until no merge improves modularity. Ties go to the
/// pair with the smallest community ids. A graph without edges has no community
/// structure and yields the zeroed result.
#[instrument(skip_all, name = "community_task")]
pub fn run(graph: &MolecularGraph) -> CommunityStructure {
    let n = graph.node_count();
    let m = graph.edge_count();
    if n == 0 || m == 0 {
        warn!(
            nodes = n,
            edges = m,
            "Graph has no edges; community detection falls back to zero communities."
        );
        return CommunityStructure::default();
    }

    let two_m = 2.0 * m as f64;
    let mut membership: Vec<usize> = (0..n).collect();
    let mut degree_sums: Vec<f64> = (0..n).map(|i| graph.degree(i) as f64).collect();
    let mut merges = 0usize;

    loop {
        let links = inter_community_links(graph, &membership);
        let best = links
            .iter()
            .map(|(&(a, b), &count)| {
                let gain = 2.0
                    * (count as f64 / two_m - (degree_sums[a] / two_m) * (degree_sums[b] / two_m));
                ((a, b), gain)
            })
            .fold(None, |best: Option<((usize, usize), f64)>, candidate| match best {
                Some((_, g)) if g >= candidate.1 => best,
                _ => Some(candidate),
            });

        let Some(((keep, absorb), gain)) = best else {
            break;
        };
        if gain <= 0.0 {
            break;
        }
        for label in membership.iter_mut() {
            if *label == absorb {
                *label = keep;
            }
        }
        degree_sums[keep] += degree_sums[absorb];
        degree_sums[absorb] = 0.0;
        merges += 1;
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (node, &label) in membership.iter().enumerate() {
        groups.entry(label).or_default().push(node);
    }
    let mut communities: Vec<Vec<usize>> = groups.into_values().collect();
    communities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

    let modularity = modularity(graph, &membership);
    debug!(
        merges,
        communities = communities.len(),
        modularity,
        "Community detection complete."
    );
    CommunityStructure {
        community_count: communities.len(),
        modularity,
        communities,
    }
}

/// Number of edges between each pair of distinct communities, keyed `(low, high)`.
fn inter_community_links(
    graph: &MolecularGraph,
    membership: &[usize],
) -> BTreeMap<(usize, usize), usize> {
    let mut links = BTreeMap::new();
    for edge in graph.edges() {
        let (a, b) = (membership[edge.source], membership[edge.target]);
        if a != b {
            *links.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    links
}

/// Newman modularity of a partition of an unweighted graph.
pub fn modularity(graph: &MolecularGraph, membership: &[usize]) -> f64 {
    let m = graph.edge_count();
    if m == 0 {
        return 0.0;
    }
    let two_m = 2.0 * m as f64;
    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut degree: BTreeMap<usize, f64> = BTreeMap::new();
    for edge in graph.edges() {
        if membership[edge.source] == membership[edge.target] {
            *internal.entry(membership[edge.source]).or_default() += 1.0;
        }
    }
    for (node, &label) in membership.iter().enumerate() {
        *degree.entry(label).or_default() += graph.degree(node) as f64;
    }
    degree
        .iter()
        .map(|(label, &d)| {
            internal.get(label).copied().unwrap_or(0.0) / m as f64 - (d / two_m).powi(2)
        })
        .sum()
}
