pub mod analyze;
pub mod dipole;
pub mod disulfides;
pub mod segment;

use crate::error::{CliError, Result};
use std::path::Path;
use toxgraph::core::io::pdb::PdbFile;
use toxgraph::core::io::psf::PsfFile;
use toxgraph::core::io::traits::{ChargeSource, StructureFile};
use toxgraph::core::models::system::MolecularSystem;
use tracing::info;

fn load_structure(path: &Path) -> Result<MolecularSystem> {
    info!("Loading input structure from {:?}", path);
    let system = PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!(
        "Loaded {} atoms in {} residues.",
        system.atom_count(),
        system.residue_count()
    );
    Ok(system)
}

fn load_charges(path: Option<&Path>) -> Result<Option<Vec<f64>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    info!("Loading per-atom charges from {:?}", path);
    PsfFile::load_charges_from_path(path)
        .map(Some)
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
}
