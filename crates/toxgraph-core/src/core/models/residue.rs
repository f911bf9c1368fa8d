use super::ids::{AtomId, ChainId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Positively Charged (Basic) ---
    Arginine,
    Lysine,
    Histidine,

    // --- Negatively Charged (Acidic) ---
    AsparticAcid,
    GlutamicAcid,
}

impl ResidueType {
    /// Canonical three-letter code.
    pub fn three_letter(&self) -> &'static str {
        match self {
            Self::Alanine => "ALA",
            Self::Glycine => "GLY",
            Self::Isoleucine => "ILE",
            Self::Leucine => "LEU",
            Self::Proline => "PRO",
            Self::Valine => "VAL",
            Self::Phenylalanine => "PHE",
            Self::Tryptophan => "TRP",
            Self::Tyrosine => "TYR",
            Self::Asparagine => "ASN",
            Self::Cysteine => "CYS",
            Self::Glutamine => "GLN",
            Self::Serine => "SER",
            Self::Threonine => "THR",
            Self::Methionine => "MET",
            Self::Arginine => "ARG",
            Self::Lysine => "LYS",
            Self::Histidine => "HIS",
            Self::AsparticAcid => "ASP",
            Self::GlutamicAcid => "GLU",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown residue name: '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    /// Parses a three-letter residue name, accepting the common force-field aliases
    /// for protonation states (HSD/HSE/HSP/HID/HIE/HIP) and oxidised cysteine (CYX).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Ok(Self::Alanine),
            "GLY" => Ok(Self::Glycine),
            "ILE" => Ok(Self::Isoleucine),
            "LEU" => Ok(Self::Leucine),
            "PRO" => Ok(Self::Proline),
            "VAL" => Ok(Self::Valine),
            "PHE" => Ok(Self::Phenylalanine),
            "TRP" => Ok(Self::Tryptophan),
            "TYR" => Ok(Self::Tyrosine),
            "ASN" => Ok(Self::Asparagine),
            "CYS" | "CYX" | "CYM" => Ok(Self::Cysteine),
            "GLN" => Ok(Self::Glutamine),
            "SER" => Ok(Self::Serine),
            "THR" => Ok(Self::Threonine),
            "MET" => Ok(Self::Methionine),
            "ARG" => Ok(Self::Arginine),
            "LYS" => Ok(Self::Lysine),
            "HIS" | "HSD" | "HSE" | "HSP" | "HID" | "HIE" | "HIP" => Ok(Self::Histidine),
            "ASP" => Ok(Self::AsparticAcid),
            "GLU" => Ok(Self::GlutamicAcid),
            other => Err(ParseResidueTypeError(other.to_string())),
        }
    }
}

/// Residue sequence number together with its optional PDB insertion code.
///
/// A residue number only counts as an integer when no insertion code is present:
/// `12` is numeric, `12A` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResidueNumber {
    pub seq: isize,
    pub insertion_code: Option<char>,
}

impl ResidueNumber {
    pub fn new(seq: isize) -> Self {
        Self {
            seq,
            insertion_code: None,
        }
    }

    pub fn with_insertion_code(seq: isize, insertion_code: char) -> Self {
        Self {
            seq,
            insertion_code: Some(insertion_code),
        }
    }

    pub fn as_integer(&self) -> Option<isize> {
        match self.insertion_code {
            None => Some(self.seq),
            Some(_) => None,
        }
    }
}

impl From<isize> for ResidueNumber {
    fn from(seq: isize) -> Self {
        Self::new(seq)
    }
}

impl fmt::Display for ResidueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.insertion_code {
            Some(code) => write!(f, "{}{}", self.seq, code),
            None => write!(f, "{}", self.seq),
        }
    }
}

impl PartialOrd for ResidueNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResidueNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seq
            .cmp(&other.seq)
            .then_with(|| self.insertion_code.cmp(&other.insertion_code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: ResidueNumber,               // Sequence number (and insertion code) from source file
    pub name: String,                        // Name of the residue (e.g., "CYS", "LYS")
    pub residue_type: Option<ResidueType>,   // Standard amino acid, if recognised
    pub chain_id: ChainId,                   // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,           // Atoms in file order
    atom_name_map: HashMap<String, AtomId>,  // First atom seen for each name
}

impl Residue {
    pub(crate) fn new(
        number: ResidueNumber,
        name: &str,
        residue_type: Option<ResidueType>,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            name: name.to_string(),
            residue_type,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn is_cysteine(&self) -> bool {
        matches!(self.residue_type, Some(ResidueType::Cysteine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::{AtomId, ChainId};
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(
            ResidueNumber::new(10),
            "GLY",
            Some(ResidueType::Glycine),
            chain_id,
        );
        assert_eq!(residue.number.seq, 10);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.atoms().is_empty());
        assert!(residue.get_atom_id_by_name("CA").is_none());
    }

    #[test]
    fn add_atom_keeps_file_order_and_first_name_mapping() {
        let mut residue = Residue::new(ResidueNumber::new(5), "ALA", None, dummy_chain_id(2));
        residue.add_atom("N", dummy_atom_id(1));
        residue.add_atom("CA", dummy_atom_id(2));
        residue.add_atom("CA", dummy_atom_id(3));
        assert_eq!(
            residue.atoms(),
            &[dummy_atom_id(1), dummy_atom_id(2), dummy_atom_id(3)]
        );
        assert_eq!(residue.get_atom_id_by_name("CA"), Some(dummy_atom_id(2)));
    }

    #[test]
    fn residue_type_parses_aliases() {
        assert_eq!("CYX".parse::<ResidueType>(), Ok(ResidueType::Cysteine));
        assert_eq!("hsp".parse::<ResidueType>(), Ok(ResidueType::Histidine));
        assert_eq!("LYS".parse::<ResidueType>(), Ok(ResidueType::Lysine));
        assert_eq!(
            "HOH".parse::<ResidueType>(),
            Err(ParseResidueTypeError("HOH".to_string()))
        );
    }

    #[test]
    fn residue_number_integer_only_without_insertion_code() {
        assert_eq!(ResidueNumber::new(12).as_integer(), Some(12));
        assert_eq!(ResidueNumber::with_insertion_code(12, 'A').as_integer(), None);
        assert_eq!(ResidueNumber::with_insertion_code(12, 'A').to_string(), "12A");
    }

    #[test]
    fn residue_number_orders_by_sequence_then_insertion_code() {
        let a = ResidueNumber::new(3);
        let b = ResidueNumber::with_insertion_code(3, 'A');
        let c = ResidueNumber::new(4);
        assert!(a < b);
        assert!(b < c);
    }
}
