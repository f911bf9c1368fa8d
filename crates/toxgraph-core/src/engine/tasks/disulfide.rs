use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::ResidueNumber;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::distance;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A covalent S–S bond between two cysteine residues.
///
/// The lower-indexed sulfur (in residue iteration order) is always reported as
/// side `a`, so each bonded pair appears exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisulfideBridge {
    pub chain_a: char,
    pub residue_name_a: String,
    pub residue_number_a: ResidueNumber,
    pub chain_b: char,
    pub residue_name_b: String,
    pub residue_number_b: ResidueNumber,
    /// SG–SG distance in Å.
    pub distance: f64,
    #[serde(skip)]
    pub residues: (ResidueId, ResidueId),
    #[serde(skip)]
    pub sulfurs: (AtomId, AtomId),
}

impl DisulfideBridge {
    pub fn residue_numbers(&self) -> (ResidueNumber, ResidueNumber) {
        (self.residue_number_a, self.residue_number_b)
    }

    /// `(chain, residue_number)` of both partners.
    pub fn locators(&self) -> [(char, ResidueNumber); 2] {
        [
            (self.chain_a, self.residue_number_a),
            (self.chain_b, self.residue_number_b),
        ]
    }
}

struct SulfurSite<'a> {
    residue_id: ResidueId,
    atom_id: AtomId,
    chain: char,
    name: &'a str,
    number: ResidueNumber,
}

/// Finds every pair of cysteine SG atoms closer than `max_distance` (strict).
#[instrument(skip_all, name = "disulfide_task")]
pub fn find_bridges(system: &MolecularSystem, max_distance: f64) -> Vec<DisulfideBridge> {
    let sites: Vec<SulfurSite> = system
        .cysteine_sulfurs()
        .into_iter()
        .filter_map(|(residue_id, atom_id)| {
            let (chain, residue) = system.atom_context(atom_id)?;
            Some(SulfurSite {
                residue_id,
                atom_id,
                chain,
                name: residue.name.as_str(),
                number: residue.number,
            })
        })
        .collect();

    if sites.len() < 2 {
        debug!(sulfurs = sites.len(), "Too few cysteine sulfurs for a bridge.");
        return Vec::new();
    }

    let bridges: Vec<DisulfideBridge> = sites
        .iter()
        .tuple_combinations()
        .filter_map(|(a, b)| {
            let pos_a = system.atom(a.atom_id)?.position;
            let pos_b = system.atom(b.atom_id)?.position;
            let separation = distance(&pos_a, &pos_b);
            (separation < max_distance).then(|| DisulfideBridge {
                chain_a: a.chain,
                residue_name_a: a.name.to_string(),
                residue_number_a: a.number,
                chain_b: b.chain,
                residue_name_b: b.name.to_string(),
                residue_number_b: b.number,
                distance: separation,
                residues: (a.residue_id, b.residue_id),
                sulfurs: (a.atom_id, b.atom_id),
            })
        })
        .collect();

    info!(
        sulfurs = sites.len(),
        bridges = bridges.len(),
        max_distance,
        "Disulfide detection complete."
    );
    bridges
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::models::atom::AtomRole;
    use crate::core::models::builder::MolecularSystemBuilder;
    use crate::core::models::chain::ChainType;
    use nalgebra::Point3;

    /// Chain A with one CYS per entry: a CA at the origin offset and an SG at `sg`.
    pub(crate) fn cysteine_system(sulfurs: &[[f64; 3]]) -> MolecularSystem {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Protein);
        for (i, sg) in sulfurs.iter().enumerate() {
            builder.start_residue(i as isize + 1, "CYS").unwrap();
            builder
                .add_atom(
                    "CA",
                    Point3::new(sg[0], sg[1] - 1.5, sg[2]),
                    AtomRole::Backbone,
                )
                .unwrap();
            builder
                .add_atom("SG", Point3::new(sg[0], sg[1], sg[2]), AtomRole::Sidechain)
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn single_bridge_among_three_cysteines() {
        let system = cysteine_system(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [12.0, 0.0, 0.0]]);
        let bridges = find_bridges(&system, 2.2);
        assert_eq!(bridges.len(), 1);
        assert_eq!(
            bridges[0].residue_numbers(),
            (ResidueNumber::new(1), ResidueNumber::new(2))
        );
        assert!((bridges[0].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cutoff_is_strict() {
        let system = cysteine_system(&[[0.0, 0.0, 0.0], [2.2, 0.0, 0.0]]);
        assert!(find_bridges(&system, 2.2).is_empty());
    }

    #[test]
    fn fewer_than_two_sulfurs_yields_nothing() {
        let system = cysteine_system(&[[0.0, 0.0, 0.0]]);
        assert!(find_bridges(&system, 2.2).is_empty());
        assert!(find_bridges(&MolecularSystem::new(), 2.2).is_empty());
    }

    #[test]
    fn each_pair_is_reported_once() {
        let system = cysteine_system(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let bridges = find_bridges(&system, 2.2);
        assert_eq!(bridges.len(), 3);
        let pairs: Vec<_> = bridges
            .iter()
            .map(|b| (b.residue_number_a.seq, b.residue_number_b.seq))
            .collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn non_cysteine_sulfurs_are_ignored() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Protein);
        builder.start_residue(1, "MET").unwrap();
        builder
            .add_atom("SG", Point3::origin(), AtomRole::Sidechain)
            .unwrap();
        builder.start_residue(2, "CYS").unwrap();
        builder
            .add_atom("SG", Point3::new(2.0, 0.0, 0.0), AtomRole::Sidechain)
            .unwrap();
        assert!(find_bridges(&builder.build(), 2.2).is_empty());
    }
}
