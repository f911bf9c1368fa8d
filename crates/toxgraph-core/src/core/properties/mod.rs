//! # Residue Properties Module
//!
//! Physicochemical knowledge attached to graph nodes and used by the dipole calculation.
//!
//! - [`tables`] - Compiled-in per-amino-acid charge, Kyte-Doolittle hydrophobicity and
//!   one-letter codes, plus element masses
//! - [`registry`] - [`ResiduePropertyTable`](registry::ResiduePropertyTable), the lookup
//!   used by the engine, optionally overridden from a TOML file
//!
//! The charge table is a deliberate simplification: one formal charge per residue
//! (Arg/Lys +1, Asp/Glu -1, His +0.5), not per-atom partial charges.

pub mod registry;
pub mod tables;
