use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueNumber, ResidueType};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Name of the alpha-carbon atom used as a residue's representative position.
pub const ALPHA_CARBON_ATOM_NAME: &str = "CA";

/// Name of the cysteine sulfur atom that forms disulfide bridges.
pub const CYSTEINE_SULFUR_GAMMA_ATOM_NAME: &str = "SG";

/// A parsed structure: atoms grouped by residue and chain.
///
/// Atom order is the order of the source file and is preserved explicitly, since
/// per-atom charge sources (PSF) are matched to the structure by position.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Atom IDs in source order.
    atom_order: Vec<AtomId>,
    /// Chain IDs in source order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, ResidueNumber), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in source-file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atom_order
            .iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    /// Returns a mutable iterator over all atoms (storage order).
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Returns an iterator over all residues, chain by chain in source order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.chain_order
            .iter()
            .filter_map(|&chain_id| self.chains.get(chain_id))
            .flat_map(|chain| chain.residues.iter())
            .filter_map(|&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in source order.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number.
    pub fn find_residue_by_number(
        &self,
        chain_id: ChainId,
        number: ResidueNumber,
    ) -> Option<ResidueId> {
        self.residue_id_map.get(&(chain_id, number)).copied()
    }

    /// Resolves the chain identifier and residue an atom belongs to.
    ///
    /// # Return
    ///
    /// Returns `Some((chain_char, &Residue))`, or `None` for a dangling atom ID.
    pub fn atom_context(&self, atom_id: AtomId) -> Option<(char, &Residue)> {
        let atom = self.atoms.get(atom_id)?;
        let residue = self.residues.get(atom.residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some((chain.id, residue))
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// The residue type is derived from the name; unrecognised names (ligands, water,
    /// modified residues) keep `residue_type = None`.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: impl Into<ResidueNumber>,
        name: &str,
    ) -> Option<ResidueId> {
        let number = number.into();
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number);

        if let Some(&existing) = self.residue_id_map.get(&key) {
            return Some(existing);
        }

        let residue_type = name.parse::<ResidueType>().ok();
        let residue_id = self
            .residues
            .insert(Residue::new(number, name, residue_type, chain_id));
        self.residue_id_map.insert(key, residue_id);
        chain.residues.push(residue_id);

        Some(residue_id)
    }

    /// Adds an atom to a specific residue, appending it to the source order.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let name = atom.name.clone();

        let atom_id = self.atoms.insert(atom);
        self.atom_order.push(atom_id);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Positions of every cysteine SG atom, with the owning residue.
    ///
    /// Residues are recognised by type, so both `CYS` and `CYX` count.
    pub fn cysteine_sulfurs(&self) -> Vec<(ResidueId, AtomId)> {
        self.residues_iter()
            .filter(|(_, residue)| residue.is_cysteine())
            .filter_map(|(res_id, residue)| {
                residue
                    .get_atom_id_by_name(CYSTEINE_SULFUR_GAMMA_ATOM_NAME)
                    .map(|sg_id| (res_id, sg_id))
            })
            .collect()
    }

    /// The alpha-carbon atom of a residue, if it has one.
    pub fn alpha_carbon(&self, residue_id: ResidueId) -> Option<AtomId> {
        self.residues
            .get(residue_id)?
            .get_atom_id_by_name(ALPHA_CARBON_ATOM_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    struct TestRefs {
        chain_a_id: ChainId,
        cys_id: ResidueId,
        cys_sg_id: AtomId,
        ala_id: ResidueId,
        ala_ca_id: AtomId,
    }

    fn create_standard_test_system() -> (MolecularSystem, TestRefs) {
        let mut system = MolecularSystem::new();
        let chain_a_id = system.add_chain('A', ChainType::Protein);
        let cys_id = system.add_residue(chain_a_id, 1, "CYS").unwrap();
        let ala_id = system.add_residue(chain_a_id, 2, "ALA").unwrap();

        system
            .add_atom_to_residue(cys_id, Atom::new("CA", cys_id, Point3::origin()))
            .unwrap();
        let cys_sg_id = system
            .add_atom_to_residue(cys_id, Atom::new("SG", cys_id, Point3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let ala_ca_id = system
            .add_atom_to_residue(ala_id, Atom::new("CA", ala_id, Point3::new(3.8, 0.0, 0.0)))
            .unwrap();

        let refs = TestRefs {
            chain_a_id,
            cys_id,
            cys_sg_id,
            ala_id,
            ala_ca_id,
        };
        (system, refs)
    }

    #[test]
    fn system_creation_and_access() {
        let (system, refs) = create_standard_test_system();

        assert_eq!(system.atom_count(), 3);
        assert_eq!(system.residue_count(), 2);
        assert_eq!(system.chains_iter().count(), 1);
        assert!(system.find_chain_by_id('B').is_none());
        assert_eq!(
            system.find_residue_by_number(refs.chain_a_id, ResidueNumber::new(2)),
            Some(refs.ala_id)
        );
        assert_eq!(system.residue(refs.cys_id).unwrap().name, "CYS");
        assert_eq!(
            system.residue(refs.cys_id).unwrap().residue_type,
            Some(ResidueType::Cysteine)
        );
    }

    #[test]
    fn atoms_iter_preserves_insertion_order() {
        let (system, _) = create_standard_test_system();
        let names: Vec<_> = system.atoms_iter().map(|(_, a)| a.name.as_str()).collect();
        assert_eq!(names, vec!["CA", "SG", "CA"]);
    }

    #[test]
    fn add_chain_and_residue_are_idempotent() {
        let (mut system, refs) = create_standard_test_system();
        assert_eq!(system.add_chain('A', ChainType::Protein), refs.chain_a_id);
        assert_eq!(
            system.add_residue(refs.chain_a_id, 1, "CYS"),
            Some(refs.cys_id)
        );
        assert_eq!(system.residue_count(), 2);
    }

    #[test]
    fn atom_context_resolves_chain_and_residue() {
        let (system, refs) = create_standard_test_system();
        let (chain, residue) = system.atom_context(refs.ala_ca_id).unwrap();
        assert_eq!(chain, 'A');
        assert_eq!(residue.number, ResidueNumber::new(2));
    }

    #[test]
    fn cysteine_sulfurs_lists_only_cys_sg_atoms() {
        let (system, refs) = create_standard_test_system();
        assert_eq!(system.cysteine_sulfurs(), vec![(refs.cys_id, refs.cys_sg_id)]);
        assert_eq!(system.alpha_carbon(refs.ala_id), Some(refs.ala_ca_id));
    }

    #[test]
    fn add_atom_to_missing_residue_fails() {
        let mut system = MolecularSystem::new();
        let atom = Atom::new("CA", ResidueId::default(), Point3::origin());
        assert!(system.add_atom_to_residue(ResidueId::default(), atom).is_none());
    }
}
