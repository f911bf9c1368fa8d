//! Input functionality for structure and topology files.
//!
//! Structures are read from PDB text into a [`MolecularSystem`](crate::core::models::system::MolecularSystem);
//! per-atom charges can be read from a PSF topology. Readers share the trait-based
//! interface in [`traits`], and [`scratch`] provides the scoped temporary file used when
//! raw bytes must be handed to a path-based parser.

pub mod pdb;
pub mod psf;
pub mod scratch;
pub mod traits;
