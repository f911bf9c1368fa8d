use super::atom::{Atom, AtomRole};
use super::chain::ChainType;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::ResidueNumber;
use super::system::MolecularSystem;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Cannot start a residue before any chain has been started")]
    NoActiveChain,
    #[error("Cannot add atom '{0}' without a current residue")]
    NoActiveResidue(String),
}

/// Incremental, record-by-record construction of a [`MolecularSystem`].
///
/// Readers feed chains, residues and atoms in file order; the builder keeps track of
/// the current chain and residue so each record only needs to say what changed.
#[derive(Debug, Default)]
pub struct MolecularSystemBuilder {
    system: MolecularSystem,
    current_chain: Option<ChainId>,
    current_residue: Option<ResidueId>,
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_chain(&mut self, id: char, chain_type: ChainType) -> &mut Self {
        self.current_chain = Some(self.system.add_chain(id, chain_type));
        self.current_residue = None;
        self
    }

    pub fn start_residue(
        &mut self,
        number: impl Into<ResidueNumber>,
        name: &str,
    ) -> Result<&mut Self, BuilderError> {
        let chain_id = self.current_chain.ok_or(BuilderError::NoActiveChain)?;
        self.current_residue = self.system.add_residue(chain_id, number, name);
        Ok(self)
    }

    /// Appends an atom to the current residue.
    pub fn add_atom(
        &mut self,
        name: &str,
        position: Point3<f64>,
        role: AtomRole,
    ) -> Result<AtomId, BuilderError> {
        let residue_id = self
            .current_residue
            .ok_or_else(|| BuilderError::NoActiveResidue(name.to_string()))?;
        let mut atom = Atom::new(name, residue_id, position);
        atom.role = role;
        self.add_prepared_atom(atom)
    }

    /// Appends a fully populated atom record to the current residue.
    pub fn add_prepared_atom(&mut self, atom: Atom) -> Result<AtomId, BuilderError> {
        let residue_id = self
            .current_residue
            .ok_or_else(|| BuilderError::NoActiveResidue(atom.name.clone()))?;
        let name = atom.name.clone();
        self.system
            .add_atom_to_residue(residue_id, atom)
            .ok_or(BuilderError::NoActiveResidue(name))
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_groups_atoms_into_residues_and_chains() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Protein);
        builder.start_residue(1, "GLY").unwrap();
        builder
            .add_atom("N", Point3::origin(), AtomRole::Backbone)
            .unwrap();
        builder
            .add_atom("CA", Point3::new(1.5, 0.0, 0.0), AtomRole::Backbone)
            .unwrap();
        builder.start_residue(2, "CYS").unwrap();
        builder
            .add_atom("SG", Point3::new(3.0, 1.0, 0.0), AtomRole::Sidechain)
            .unwrap();
        let system = builder.build();

        assert_eq!(system.atom_count(), 3);
        assert_eq!(system.residue_count(), 2);
        assert_eq!(system.cysteine_sulfurs().len(), 1);
    }

    #[test]
    fn residue_without_chain_is_rejected() {
        let mut builder = MolecularSystemBuilder::new();
        assert_eq!(
            builder.start_residue(1, "ALA").err(),
            Some(BuilderError::NoActiveChain)
        );
    }

    #[test]
    fn atom_without_residue_is_rejected() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Protein);
        assert_eq!(
            builder.add_atom("CA", Point3::origin(), AtomRole::Backbone),
            Err(BuilderError::NoActiveResidue("CA".to_string()))
        );
    }
}
