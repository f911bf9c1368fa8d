//! # toxgraph Core Library
//!
//! Structure-graph analysis for venom-derived peptide toxins: interaction graphs built from
//! atomic coordinates, disulfide-bridge detection, graph-theoretic descriptors, dipole
//! moments, and per-residue segmentation of atom-level graphs.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`, `MolecularGraph`),
//!   structure readers (PDB, PSF charges), residue property tables and geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, progress reporting and
//!   the algorithmic tasks (graph construction, centrality, community detection, segmentation,
//!   dipole computation).
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `core` and `engine` together:
//!   [`workflows::build_graph`], [`workflows::compute_metrics`], [`workflows::compute_dipole`],
//!   [`workflows::segment`] and the combined [`workflows::analyze::run`].
//!
//! Every call works on fresh, caller-owned data. Nothing is cached between calls and no
//! process-wide state is kept.

pub mod core;
pub mod engine;
pub mod workflows;
