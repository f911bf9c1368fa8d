//! # Core Models Module
//!
//! Data structures for parsed structures and the interaction graphs built from them.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom records with coordinates, element and optional charge
//! - [`residue`] - Residue records, residue numbering and amino acid classification
//! - [`chain`] - Chain organization
//! - [`system`] - A complete parsed structure with source-order atom iteration
//! - [`builder`] - Record-by-record construction used by the structure readers
//! - [`graph`] - Typed atom- or residue-level interaction graph
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use toxgraph::core::models::{system::MolecularSystem, atom::Atom, chain::ChainType};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A', ChainType::Protein);
//! let residue_id = system.add_residue(chain_id, 1, "CYS").unwrap();
//! system.add_atom_to_residue(residue_id, Atom::new("SG", residue_id, Point3::origin()));
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod graph;
pub mod ids;
pub mod residue;
pub mod system;
