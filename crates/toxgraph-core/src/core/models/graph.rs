use super::residue::ResidueNumber;
use nalgebra::{Point3, Vector3};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

/// Resolution of graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One node per parsed atom.
    #[default]
    Atom,
    /// One node per residue, placed on its alpha carbon.
    Residue,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid granularity '{0}', expected 'atom' or 'residue'")]
pub struct ParseGranularityError(pub String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atom" | "atomic" => Ok(Self::Atom),
            "residue" | "ca" | "calpha" => Ok(Self::Residue),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Atom => "atom",
                Self::Residue => "residue",
            }
        )
    }
}

/// Origin of an edge. Variants are ordered by increasing precedence when two kinds
/// compete for the same node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Distance,
    Peptide,
    Disulfide,
}

/// Builds the composite node key `chain:residue_name:residue_number[:atom_name]`.
pub fn node_key(
    chain: char,
    residue_name: &str,
    residue_number: ResidueNumber,
    atom_name: Option<&str>,
) -> String {
    match atom_name {
        Some(atom) => format!("{}:{}:{}:{}", chain, residue_name, residue_number, atom),
        None => format!("{}:{}:{}", chain, residue_name, residue_number),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub key: String,
    pub chain: char,
    pub residue_name: String,
    pub residue_number: ResidueNumber,
    pub atom_name: Option<String>,
    pub amino_acid: char,
    pub hydrophobicity: f64,
    pub charge: f64,
    pub position: Point3<f64>,
    pub is_surface: bool,
    pub is_in_disulfide: bool,
    pub is_pharmacophore: bool,
}

impl GraphNode {
    /// Key of the residue this node belongs to (`chain:residue_name:residue_number`).
    pub fn residue_key(&self) -> String {
        node_key(self.chain, &self.residue_name, self.residue_number, None)
    }

    /// `(chain, residue_number)`, the grouping used for segmentation.
    pub fn residue_locator(&self) -> (char, ResidueNumber) {
        (self.chain, self.residue_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    pub weight: f64,
    pub interaction_strength: f64,
    /// Euclidean distance between the two node positions.
    pub distance: f64,
    /// Whether the pair also satisfies the distance-threshold rule, whatever kind won.
    pub within_threshold: bool,
}

impl GraphEdge {
    pub fn other(&self, node: usize) -> usize {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

/// Graph-level metadata, fixed at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GraphAttributes {
    pub granularity: Granularity,
    pub distance_threshold: f64,
    pub disulfide_count: usize,
    pub dipole_vector: Option<Vector3<f64>>,
    pub dipole_magnitude: Option<f64>,
}

/// Undirected interaction graph over atoms or residues.
///
/// Backed by a petgraph [`UnGraph`]; nodes are addressed either by dense index
/// (the petgraph node index) or by composite string key. Each node pair carries at
/// most one edge; when several kinds apply, the one with the higher interaction
/// strength is kept.
#[derive(Debug, Clone, Default)]
pub struct MolecularGraph {
    inner: UnGraph<GraphNode, GraphEdge>,
    key_index: HashMap<String, NodeIndex>,
    attributes: GraphAttributes,
}

impl MolecularGraph {
    pub fn new(granularity: Granularity, distance_threshold: f64) -> Self {
        Self {
            attributes: GraphAttributes {
                granularity,
                distance_threshold,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// The underlying petgraph graph, for handing to graph algorithm crates.
    pub fn inner(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.inner
    }

    /// Inserts a node, or returns the index of the node already stored under that key.
    pub fn add_node(&mut self, node: GraphNode) -> usize {
        if let Some(&existing) = self.key_index.get(&node.key) {
            return existing.index();
        }
        let key = node.key.clone();
        let index = self.inner.add_node(node);
        self.key_index.insert(key, index);
        index.index()
    }

    /// Adds or upgrades the edge between `a` and `b`.
    ///
    /// Returns `false` for self loops and out-of-range indices. When an edge already
    /// exists, the stronger kind wins and the `within_threshold` flag is merged.
    pub fn add_edge(
        &mut self,
        a: usize,
        b: usize,
        kind: EdgeKind,
        weight: f64,
        interaction_strength: f64,
        within_threshold: bool,
    ) -> bool {
        let n = self.inner.node_count();
        if a == b || a >= n || b >= n {
            return false;
        }
        let (ia, ib) = (NodeIndex::new(a), NodeIndex::new(b));

        if let Some(edge) = self
            .inner
            .find_edge(ia, ib)
            .and_then(|e| self.inner.edge_weight_mut(e))
        {
            edge.within_threshold |= within_threshold;
            if interaction_strength > edge.interaction_strength {
                edge.kind = kind;
                edge.weight = weight;
                edge.interaction_strength = interaction_strength;
            }
            return true;
        }

        let distance = (self.inner[ia].position - self.inner[ib].position).norm();
        self.inner.add_edge(
            ia,
            ib,
            GraphEdge {
                source: a.min(b),
                target: a.max(b),
                kind,
                weight,
                interaction_strength,
                distance,
                within_threshold,
            },
        );
        true
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Number of node pairs that satisfy the distance-threshold rule.
    pub fn distance_edge_count(&self) -> usize {
        self.edges().filter(|e| e.within_threshold).count()
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &GraphNode> + Clone {
        self.inner.raw_nodes().iter().map(|n| &n.weight)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &GraphEdge> + Clone {
        self.inner.raw_edges().iter().map(|e| &e.weight)
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.inner.node_weight(NodeIndex::new(index))
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).map(|i| i.index())
    }

    pub fn node_by_key(&self, key: &str) -> Option<&GraphNode> {
        self.key_index.get(key).map(|&i| &self.inner[i])
    }

    /// Mutable node access for annotation passes (surface, pharmacophore flags).
    pub fn node_mut_by_key(&mut self, key: &str) -> Option<&mut GraphNode> {
        let index = *self.key_index.get(key)?;
        self.inner.node_weight_mut(index)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.inner.node_weights_mut()
    }

    /// Neighbor indices of a node in ascending order; empty for an unknown index.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        if index >= self.inner.node_count() {
            return Vec::new();
        }
        let mut neighbors: Vec<usize> = self
            .inner
            .neighbors(NodeIndex::new(index))
            .map(|n| n.index())
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn degree(&self, index: usize) -> usize {
        if index >= self.inner.node_count() {
            return 0;
        }
        self.inner.edges(NodeIndex::new(index)).count()
    }

    pub fn edge_between(&self, a: usize, b: usize) -> Option<&GraphEdge> {
        let n = self.inner.node_count();
        if a >= n || b >= n {
            return None;
        }
        let edge = self.inner.find_edge(NodeIndex::new(a), NodeIndex::new(b))?;
        self.inner.edge_weight(edge)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge_between(a, b).is_some()
    }

    pub fn attributes(&self) -> &GraphAttributes {
        &self.attributes
    }

    pub(crate) fn set_disulfide_count(&mut self, count: usize) {
        self.attributes.disulfide_count = count;
    }

    pub(crate) fn set_dipole(&mut self, vector: Vector3<f64>, magnitude: f64) {
        self.attributes.dipole_vector = Some(vector);
        self.attributes.dipole_magnitude = Some(magnitude);
    }
}

/// Panics on an out-of-range index, like slice indexing.
impl Index<usize> for MolecularGraph {
    type Output = GraphNode;

    fn index(&self, index: usize) -> &GraphNode {
        &self.inner[NodeIndex::new(index)]
    }
}
