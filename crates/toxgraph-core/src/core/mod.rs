//! # Core Module
//!
//! Fundamental data structures and I/O for toxin structure analysis.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, systems and the
//!   interaction graph built over them
//! - **File I/O** ([`io`]) - PDB structure reading, PSF charge reading and scoped scratch files
//! - **Residue Knowledge** ([`properties`]) - Charge, hydrophobicity and mass tables
//! - **Utilities** ([`utils`]) - Geometry and atom-name helpers

pub mod io;
pub mod models;
pub mod properties;
pub mod utils;
