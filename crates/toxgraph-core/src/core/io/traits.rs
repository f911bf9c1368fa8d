use crate::core::models::system::MolecularSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

/// Defines the interface for reading molecular structure formats.
///
/// Implementors handle format-specific parsing; the provided methods add path and
/// in-memory byte entry points on top of [`read_with`](StructureFile::read_with).
pub trait StructureFile {
    /// Reader options for the format.
    type Options: Default;

    /// The error type for read operations.
    type Error: Error + From<io::Error> + Send + Sync + 'static;

    /// Reads a molecular system from a buffered reader with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_with(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<MolecularSystem, Self::Error>;

    /// Reads a molecular system from a buffered reader with default options.
    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error> {
        Self::read_with(reader, &Self::Options::default())
    }

    /// Reads a molecular system from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MolecularSystem, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads a molecular system from raw bytes held in memory.
    fn read_from_bytes(bytes: &[u8]) -> Result<MolecularSystem, Self::Error> {
        let mut reader = Cursor::new(bytes);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for per-atom charge sources.
///
/// The returned sequence is ordered to match the atom order of the structure it
/// describes; length parity is checked by the consumer, not here.
pub trait ChargeSource {
    /// The error type for read operations.
    type Error: Error + From<io::Error> + Send + Sync + 'static;

    /// Reads the per-atom charge sequence from a buffered reader.
    fn load_charges(reader: &mut impl BufRead) -> Result<Vec<f64>, Self::Error>;

    /// Reads the per-atom charge sequence from a file path.
    fn load_charges_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::load_charges(&mut reader)
    }

    /// Reads the per-atom charge sequence from raw bytes held in memory.
    fn load_charges_from_bytes(bytes: &[u8]) -> Result<Vec<f64>, Self::Error> {
        let mut reader = Cursor::new(bytes);
        Self::load_charges(&mut reader)
    }
}
