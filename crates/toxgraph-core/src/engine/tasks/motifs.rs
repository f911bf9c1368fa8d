use crate::core::models::graph::MolecularGraph;
use serde::Serialize;
use std::collections::HashSet;

/// Minimum bridges for a cystine knot.
pub const KNOT_MIN_BRIDGES: usize = 3;
/// Minimum residues taking part in those bridges.
pub const KNOT_MIN_RESIDUES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructuralMotifs {
    pub disulfide_bridges: usize,
    pub disulfide_residues: usize,
    pub cystine_knot: bool,
}

/// Cystine-knot heuristic: at least three bridges spread over at least six residues.
pub fn detect_cystine_knot(bridge_count: usize, disulfide_residue_count: usize) -> bool {
    bridge_count >= KNOT_MIN_BRIDGES && disulfide_residue_count >= KNOT_MIN_RESIDUES
}

/// Motif flags for a built graph, from its `disulfide_count` attribute and the
/// distinct residues whose nodes carry `is_in_disulfide`.
pub fn run(graph: &MolecularGraph) -> StructuralMotifs {
    let disulfide_bridges = graph.attributes().disulfide_count;
    let disulfide_residues = graph
        .nodes()
        .filter(|node| node.is_in_disulfide)
        .map(|node| node.residue_locator())
        .collect::<HashSet<_>>()
        .len();
    StructuralMotifs {
        disulfide_bridges,
        disulfide_residues,
        cystine_knot: detect_cystine_knot(disulfide_bridges, disulfide_residues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knot_requires_three_bridges_and_six_residues() {
        assert!(detect_cystine_knot(3, 6));
        assert!(detect_cystine_knot(4, 8));
        assert!(!detect_cystine_knot(2, 6));
        assert!(!detect_cystine_knot(3, 5));
        assert!(!detect_cystine_knot(0, 0));
    }
}
