use super::ids::ResidueId;
use nalgebra::Point3;
use std::str::FromStr;

/// Represents the role or classification of an atom within a molecular structure.
///
/// Roles are assigned by the structure reader from the record type and the atom name,
/// and let downstream passes tell backbone atoms from side-chain or hetero atoms
/// without re-parsing names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Backbone atom of a polypeptide (N, CA, C, O and their hydrogens).
    Backbone,
    /// Side-chain atom of a standard residue.
    Sidechain,
    /// Atom from a `HETATM` record that is not water.
    Hetero,
    /// Water molecule atom.
    Water,
    /// Unknown or unclassified atom role.
    #[default]
    Other,
}

/// A single parsed atom record.
///
/// Atoms are immutable once the reader has produced them; chain, residue name and
/// residue number live on the parent [`Residue`](super::residue::Residue) and
/// [`Chain`](super::chain::Chain) and are reached through the owning system.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "SG", "NZ").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The role or classification of the atom in the molecular structure.
    pub role: AtomRole,
    /// Element symbol, upper case (e.g., "C", "S", "FE").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Partial charge in elementary charge units, when the source carries one.
    pub partial_charge: Option<f64>,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Temperature factor.
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with default values for most fields.
    ///
    /// The element is inferred from the atom name; it can be overwritten afterward
    /// when the source file provides an explicit element column.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            residue_id,
            role: AtomRole::default(),
            element: infer_element(name),
            position,
            partial_charge: None,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == "H" || self.element == "D"
    }
}

/// Guesses an element symbol from a PDB atom name.
///
/// Leading digits are skipped (`1HB` -> `H`) and the first alphabetic character is used.
/// Two-letter elements cannot be told apart from names alone, so only the common
/// biomolecular single-letter elements are produced here.
pub fn infer_element(atom_name: &str) -> String {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

impl FromStr for AtomRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backbone" => Ok(AtomRole::Backbone),
            "sidechain" | "side-chain" | "side_chain" => Ok(AtomRole::Sidechain),
            "hetero" | "hetatm" | "ligand" => Ok(AtomRole::Hetero),
            "water" => Ok(AtomRole::Water),
            "other" | "unknown" => Ok(AtomRole::Other),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.element, "C");
        assert_eq!(atom.partial_charge, None);
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.role, AtomRole::Other);
    }

    #[test]
    fn infer_element_skips_leading_digits() {
        assert_eq!(infer_element("1HB"), "H");
        assert_eq!(infer_element(" SG "), "S");
        assert_eq!(infer_element("nz"), "N");
        assert_eq!(infer_element("12"), "");
    }

    #[test]
    fn hydrogen_detection_uses_element() {
        let mut atom = Atom::new("HA", ResidueId::default(), Point3::origin());
        assert!(atom.is_hydrogen());
        atom.element = "C".to_string();
        assert!(!atom.is_hydrogen());
    }

    #[test]
    fn from_str_parses_valid_roles() {
        assert_eq!(AtomRole::from_str("backbone"), Ok(AtomRole::Backbone));
        assert_eq!(AtomRole::from_str("Side-Chain"), Ok(AtomRole::Sidechain));
        assert_eq!(AtomRole::from_str("HETATM"), Ok(AtomRole::Hetero));
        assert_eq!(AtomRole::from_str("water"), Ok(AtomRole::Water));
        assert_eq!(AtomRole::from_str("unknown"), Ok(AtomRole::Other));
    }

    #[test]
    fn from_str_returns_err_for_invalid_role() {
        assert_eq!(AtomRole::from_str("foo"), Err(()));
        assert_eq!(AtomRole::from_str(""), Err(()));
    }
}
