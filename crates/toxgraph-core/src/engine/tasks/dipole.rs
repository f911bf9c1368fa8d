//! Electric dipole moment of a structure about its center.
//!
//! Charges come from one of two sources. Per-atom partial charges (typically a PSF
//! topology) are matched to the structure by atom order and must cover every atom.
//! Without a topology, each residue contributes the fixed formal charge of its
//! amino acid, placed on its alpha carbon; side-chain geometry and partial charges
//! are ignored in that mode, so the result is an approximation of polarity rather
//! than a physical dipole.

use crate::core::models::graph::MolecularGraph;
use crate::core::models::system::MolecularSystem;
use crate::core::properties::registry::ResiduePropertyTable;
use crate::core::properties::tables::element_mass;
use crate::core::utils::geometry::{angle_between, centroid, weighted_centroid};
use crate::engine::config::DipoleConfig;
use crate::engine::error::EngineError;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy)]
pub enum ChargeAssignment<'a> {
    /// One charge per structure atom, in structure atom order.
    PerAtom(&'a [f64]),
    /// Formal residue charges from the table, one per alpha carbon.
    ResidueTable(&'a ResiduePropertyTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStrategy {
    PerAtom,
    ResidueTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisAngle {
    pub degrees: f64,
    pub radians: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DipoleResult {
    pub vector: Vector3<f64>,
    pub magnitude: f64,
    /// Unit vector along `vector`, or zero when the magnitude is zero.
    pub normalized: Vector3<f64>,
    pub center_of_mass: Point3<f64>,
    /// Angle to the configured reference axis (+Z unless overridden).
    pub angle_with_z_axis: AxisAngle,
    pub charged_atoms: usize,
    pub strategy: ChargeStrategy,
}

#[instrument(skip_all, name = "dipole_task")]
pub fn run(
    system: &MolecularSystem,
    charges: ChargeAssignment,
    config: &DipoleConfig,
) -> Result<DipoleResult, EngineError> {
    config.validate()?;
    let (points, values, elements, strategy) = collect_charges(system, charges)?;
    if points.is_empty() {
        return Err(EngineError::EmptyStructure {
            context: "dipole calculation",
        });
    }

    let center = if config.mass_weighted {
        let masses: Vec<f64> = elements.iter().map(|e| element_mass(e)).collect();
        weighted_centroid(&points, &masses)
    } else {
        centroid(&points)
    };
    let center =
        center.ok_or_else(|| EngineError::Internal("center of mass is undefined".to_string()))?;

    let vector: Vector3<f64> = points
        .iter()
        .zip(&values)
        .map(|(p, &q)| (p - center) * q)
        .sum();
    let magnitude = vector.norm();
    let normalized = if magnitude > 0.0 {
        vector / magnitude
    } else {
        Vector3::zeros()
    };
    let radians = angle_between(&normalized, &config.reference_axis).unwrap_or(FRAC_PI_2);

    info!(
        atoms = points.len(),
        magnitude,
        strategy = ?strategy,
        "Dipole moment computed."
    );
    Ok(DipoleResult {
        vector,
        magnitude,
        normalized,
        center_of_mass: center,
        angle_with_z_axis: AxisAngle {
            degrees: radians.to_degrees(),
            radians,
        },
        charged_atoms: points.len(),
        strategy,
    })
}

/// Records the dipole on the graph's metadata.
pub fn attach_to_graph(graph: &mut MolecularGraph, dipole: &DipoleResult) {
    graph.set_dipole(dipole.vector, dipole.magnitude);
}

type ChargedAtoms<'s> = (Vec<Point3<f64>>, Vec<f64>, Vec<&'s str>, ChargeStrategy);

fn collect_charges<'s>(
    system: &'s MolecularSystem,
    charges: ChargeAssignment,
) -> Result<ChargedAtoms<'s>, EngineError> {
    match charges {
        ChargeAssignment::PerAtom(per_atom) => {
            let structure_atoms = system.atom_count();
            if per_atom.len() != structure_atoms {
                return Err(EngineError::ChargeSourceMismatch {
                    structure_atoms,
                    charge_records: per_atom.len(),
                });
            }
            let (points, elements): (Vec<Point3<f64>>, Vec<&str>) = system
                .atoms_iter()
                .map(|(_, atom)| (atom.position, atom.element.as_str()))
                .unzip();
            Ok((points, per_atom.to_vec(), elements, ChargeStrategy::PerAtom))
        }
        ChargeAssignment::ResidueTable(table) => {
            let mut points = Vec::new();
            let mut values = Vec::new();
            let mut elements = Vec::new();
            for (residue_id, residue) in system.residues_iter() {
                let Some(atom) = system
                    .alpha_carbon(residue_id)
                    .and_then(|id| system.atom(id))
                else {
                    continue;
                };
                points.push(atom.position);
                values.push(table.charge(&residue.name));
                elements.push(atom.element.as_str());
            }
            debug!(residues = points.len(), "Assigned residue-table charges.");
            Ok((points, values, elements, ChargeStrategy::ResidueTable))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tasks::graph_build::tests::system_from;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOL: f64 = 1e-9;

    fn table() -> ResiduePropertyTable {
        ResiduePropertyTable::builtin()
    }

    fn charged_pair() -> MolecularSystem {
        system_from(&[(
            "UNK",
            1,
            &[("X1", [0.0, 0.0, 1.0]), ("X2", [0.0, 0.0, -1.0])],
        )])
    }

    #[test]
    fn opposite_charges_along_z() {
        let result = run(
            &charged_pair(),
            ChargeAssignment::PerAtom(&[1.0, -1.0]),
            &DipoleConfig::default(),
        )
        .unwrap();
        assert!((result.vector - Vector3::new(0.0, 0.0, 2.0)).norm() < TOL);
        assert!((result.magnitude - 2.0).abs() < TOL);
        assert!((result.normalized - Vector3::z()).norm() < TOL);
        assert!(result.center_of_mass.coords.norm() < TOL);
        assert!(result.angle_with_z_axis.degrees.abs() < TOL);
        assert_eq!(result.strategy, ChargeStrategy::PerAtom);
    }

    #[test]
    fn count_mismatch_is_an_error() {
        let result = run(
            &charged_pair(),
            ChargeAssignment::PerAtom(&[1.0, -1.0, 0.5]),
            &DipoleConfig::default(),
        );
        match result {
            Err(EngineError::ChargeSourceMismatch {
                structure_atoms,
                charge_records,
            }) => {
                assert_eq!(structure_atoms, 2);
                assert_eq!(charge_records, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn zero_charges_give_zero_dipole() {
        let result = run(
            &charged_pair(),
            ChargeAssignment::PerAtom(&[0.0, 0.0]),
            &DipoleConfig::default(),
        )
        .unwrap();
        assert_eq!(result.vector, Vector3::zeros());
        assert_eq!(result.magnitude, 0.0);
        assert_eq!(result.normalized, Vector3::zeros());
        assert!((result.angle_with_z_axis.degrees - 90.0).abs() < TOL);
    }

    #[test]
    fn residue_table_uses_alpha_carbons_only() {
        let system = system_from(&[
            ("LYS", 1, &[("CA", [0.0, 0.0, 5.0]), ("NZ", [9.0, 9.0, 9.0])]),
            ("ALA", 2, &[("CA", [3.0, 1.0, 0.0])]),
            ("ASP", 3, &[("CA", [0.0, 0.0, -5.0]), ("OD1", [-9.0, 0.0, 0.0])]),
        ]);
        let result = run(
            &system,
            ChargeAssignment::ResidueTable(&table()),
            &DipoleConfig::default(),
        )
        .unwrap();
        assert_eq!(result.charged_atoms, 3);
        assert!((result.vector - Vector3::new(0.0, 0.0, 10.0)).norm() < TOL);
        assert!((result.center_of_mass - Point3::new(1.0, 1.0 / 3.0, 0.0)).norm() < TOL);
        assert_eq!(result.strategy, ChargeStrategy::ResidueTable);
    }

    #[test]
    fn reference_axis_changes_reported_angle() {
        let config = DipoleConfig {
            reference_axis: Vector3::x(),
            ..Default::default()
        };
        let result = run(&charged_pair(), ChargeAssignment::PerAtom(&[1.0, -1.0]), &config).unwrap();
        assert!((result.angle_with_z_axis.radians - FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn mass_weighting_moves_the_center() {
        let system = system_from(&[("UNK", 1, &[("C1", [0.0, 0.0, 0.0]), ("S1", [1.0, 0.0, 0.0])])]);
        let config = DipoleConfig {
            mass_weighted: true,
            ..Default::default()
        };
        let result = run(&system, ChargeAssignment::PerAtom(&[0.0, 0.0]), &config).unwrap();
        let expected_x = element_mass("S") / (element_mass("C") + element_mass("S"));
        assert!((result.center_of_mass.x - expected_x).abs() < TOL);
    }

    #[test]
    fn no_atoms_is_an_error() {
        let result = run(
            &MolecularSystem::new(),
            ChargeAssignment::PerAtom(&[]),
            &DipoleConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::EmptyStructure { .. })));

        let no_alpha_carbons = system_from(&[("HOH", 1, &[("O", [0.0, 0.0, 0.0])])]);
        let result = run(
            &no_alpha_carbons,
            ChargeAssignment::ResidueTable(&table()),
            &DipoleConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::EmptyStructure { .. })));
    }

    #[test]
    fn translation_leaves_magnitude_and_direction_unchanged() {
        let mut rng = StdRng::seed_from_u64(2024);
        let coords: Vec<[f64; 3]> = (0..12)
            .map(|_| {
                [
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                ]
            })
            .collect();
        let charges: Vec<f64> = (0..12).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let names: Vec<String> = (0..12).map(|i| format!("C{}", i)).collect();

        let build = |offset: [f64; 3]| {
            let atoms: Vec<(&str, [f64; 3])> = names
                .iter()
                .zip(&coords)
                .map(|(n, c)| {
                    (
                        n.as_str(),
                        [c[0] + offset[0], c[1] + offset[1], c[2] + offset[2]],
                    )
                })
                .collect();
            system_from(&[("UNK", 1, atoms.as_slice())])
        };

        for mass_weighted in [false, true] {
            let config = DipoleConfig {
                mass_weighted,
                ..Default::default()
            };
            let reference =
                run(&build([0.0; 3]), ChargeAssignment::PerAtom(&charges), &config).unwrap();
            for _ in 0..50 {
                let offset = [
                    rng.gen_range(-1000.0..1000.0),
                    rng.gen_range(-1000.0..1000.0),
                    rng.gen_range(-1000.0..1000.0),
                ];
                let moved = run(&build(offset), ChargeAssignment::PerAtom(&charges), &config).unwrap();
                assert!((moved.magnitude - reference.magnitude).abs() < 1e-7);
                assert!((moved.normalized - reference.normalized).norm() < 1e-7);
            }
        }
    }

    #[test]
    fn attach_to_graph_sets_metadata() {
        let mut graph = MolecularGraph::new(crate::core::models::graph::Granularity::Atom, 5.0);
        let result = run(
            &charged_pair(),
            ChargeAssignment::PerAtom(&[1.0, -1.0]),
            &DipoleConfig::default(),
        )
        .unwrap();
        attach_to_graph(&mut graph, &result);
        assert_eq!(graph.attributes().dipole_magnitude, Some(result.magnitude));
        assert_eq!(graph.attributes().dipole_vector, Some(result.vector));
    }
}
