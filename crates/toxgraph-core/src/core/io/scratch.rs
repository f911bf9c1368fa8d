use crate::core::io::traits::StructureFile;
use crate::core::models::system::MolecularSystem;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

const SCRATCH_PREFIX: &str = "toxgraph-";

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("Failed to materialize scratch file: {0}")]
    Materialize(#[from] io::Error),
    #[error("Failed to parse scratch file: {0}")]
    Parse(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A temporary on-disk copy of in-memory structure data.
///
/// The file is removed when the guard is dropped, whether parsing succeeded,
/// failed, or the caller unwound.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Writes `bytes` to a fresh temporary file whose name ends in `suffix`.
    pub fn materialize(bytes: &[u8], suffix: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), bytes = bytes.len(), "Materialized scratch file.");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Parses raw structure bytes through a path-based reader.
///
/// The bytes are written to a [`ScratchFile`] that lives only for the duration of
/// the call.
pub fn read_structure_bytes<F: StructureFile>(
    bytes: &[u8],
    suffix: &str,
) -> Result<MolecularSystem, ScratchError> {
    let scratch = ScratchFile::materialize(bytes, suffix)?;
    F::read_from_path(scratch.path()).map_err(|e| ScratchError::Parse(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use std::path::PathBuf;

    const ONE_ATOM: &str =
        "ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C\n";

    #[test]
    fn scratch_file_is_removed_on_drop() {
        let path: PathBuf;
        {
            let scratch = ScratchFile::materialize(b"payload", ".pdb").unwrap();
            path = scratch.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(std::fs::read(&path).unwrap(), b"payload");
            assert!(path.to_string_lossy().ends_with(".pdb"));
        }
        assert!(!path.exists());
    }

    #[test]
    fn read_structure_bytes_parses_through_a_path() {
        let system = read_structure_bytes::<PdbFile>(ONE_ATOM.as_bytes(), ".pdb").unwrap();
        assert_eq!(system.atom_count(), 1);
    }

    #[test]
    fn parse_failures_are_wrapped() {
        let result = read_structure_bytes::<PdbFile>(b"not a structure\n", ".pdb");
        assert!(matches!(result, Err(ScratchError::Parse(_))));
    }
}
