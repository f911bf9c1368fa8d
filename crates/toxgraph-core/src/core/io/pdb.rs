use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, AtomRole, infer_element};
use crate::core::models::builder::{BuilderError, MolecularSystemBuilder};
use crate::core::models::chain::ChainType;
use crate::core::models::residue::{ResidueNumber, ResidueType};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::identifiers::{is_backbone_atom, is_water_residue};
use nalgebra::Point3;
use std::collections::HashSet;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

/// Chain identifier used when column 22 is blank.
const DEFAULT_CHAIN_ID: char = 'A';

/// Shortest ATOM/HETATM line that still carries the three coordinates.
const MIN_COORDINATE_LINE_LENGTH: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data on line {line}: {source}")]
    Build {
        line: usize,
        #[source]
        source: BuilderError,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdbReadOptions {
    /// Keep water molecules from HETATM records.
    pub keep_water: bool,
    /// Keep non-water HETATM records (ligands, ions, modified residues).
    pub keep_hetero: bool,
}

impl Default for PdbReadOptions {
    fn default() -> Self {
        Self {
            keep_water: false,
            keep_hetero: true,
        }
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(line: &str, start: usize, end: usize, default: f64) -> f64 {
    slice_and_trim(line, start, end).parse().unwrap_or(default)
}

/// Parses the two-character formal charge column (`2+`, `1-`, `+1`).
fn parse_formal_charge(field: &str) -> Option<f64> {
    if field.is_empty() {
        return None;
    }
    let sign = if field.contains('-') { -1.0 } else { 1.0 };
    let magnitude: f64 = field
        .trim_matches(|c| c == '+' || c == '-')
        .parse()
        .ok()?;
    Some(sign * magnitude)
}

fn assign_role(record_type: &str, residue_name: &str, atom_name: &str) -> AtomRole {
    if is_water_residue(residue_name) {
        return AtomRole::Water;
    }
    let standard = residue_name.parse::<ResidueType>().is_ok();
    if record_type == "HETATM" && !standard {
        return AtomRole::Hetero;
    }
    if is_backbone_atom(atom_name) {
        AtomRole::Backbone
    } else {
        AtomRole::Sidechain
    }
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Options = PdbReadOptions;
    type Error = PdbError;

    fn read_with(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<MolecularSystem, Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut seen_atoms: HashSet<(char, ResidueNumber, String)> = HashSet::new();
        let mut current_residue: Option<(char, ResidueNumber, String)> = None;
        let mut current_chain: Option<char> = None;
        let mut atom_records = 0usize;
        let mut skipped_alternates = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LENGTH {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name_str = slice_and_trim(&line, 12, 16);
                    let alt_loc = slice_and_trim(&line, 16, 17);
                    let res_name_str = slice_and_trim(&line, 17, 20);
                    let chain_str = slice_and_trim(&line, 21, 22);
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let i_code_str = slice_and_trim(&line, 26, 27);

                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    if res_name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "18-20".into(),
                            },
                        });
                    }

                    let is_water = is_water_residue(res_name_str);
                    if record_type == "HETATM" {
                        if is_water && !options.keep_water {
                            continue;
                        }
                        if !is_water && !options.keep_hetero {
                            continue;
                        }
                    }

                    let seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let number = match i_code_str.chars().next() {
                        Some(code) => ResidueNumber::with_insertion_code(seq, code),
                        None => ResidueNumber::new(seq),
                    };
                    let chain_id = chain_str.chars().next().unwrap_or(DEFAULT_CHAIN_ID);

                    let atom_key = (chain_id, number, name_str.to_string());
                    if seen_atoms.contains(&atom_key) {
                        if !alt_loc.is_empty() {
                            skipped_alternates += 1;
                        }
                        continue;
                    }

                    let x = parse_float(&line, 30, 38, line_num)?;
                    let y = parse_float(&line, 38, 46, line_num)?;
                    let z = parse_float(&line, 46, 54, line_num)?;

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let serial = serial_str.parse().unwrap_or_else(|_| {
                        debug!(line = line_num, value = serial_str, "Non-decimal atom serial, using record index.");
                        atom_records + 1
                    });

                    if current_chain != Some(chain_id) {
                        let chain_type = if record_type == "ATOM" {
                            ChainType::Protein
                        } else if is_water {
                            ChainType::Water
                        } else {
                            ChainType::Hetero
                        };
                        builder.start_chain(chain_id, chain_type);
                        current_chain = Some(chain_id);
                        current_residue = None;
                    }
                    let residue_key = (chain_id, number, res_name_str.to_string());
                    if current_residue.as_ref() != Some(&residue_key) {
                        builder
                            .start_residue(number, res_name_str)
                            .map_err(|source| PdbError::Build {
                                line: line_num,
                                source,
                            })?;
                        current_residue = Some(residue_key);
                    }

                    let element_str = slice_and_trim(&line, 76, 78);
                    let mut atom = Atom::new(
                        name_str,
                        Default::default(),
                        Point3::new(x, y, z),
                    );
                    atom.serial = serial;
                    atom.role = assign_role(record_type, res_name_str, name_str);
                    atom.element = if element_str.is_empty() {
                        infer_element(name_str)
                    } else {
                        element_str.to_ascii_uppercase()
                    };
                    atom.occupancy = parse_optional_float(&line, 54, 60, 1.0);
                    atom.b_factor = parse_optional_float(&line, 60, 66, 0.0);
                    atom.partial_charge = parse_formal_charge(slice_and_trim(&line, 78, 80));

                    builder
                        .add_prepared_atom(atom)
                        .map_err(|source| PdbError::Build {
                            line: line_num,
                            source,
                        })?;
                    seen_atoms.insert(atom_key);
                    atom_records += 1;
                }
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if atom_records == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        debug!(
            atoms = atom_records,
            skipped_alternates, "Finished reading PDB records."
        );
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRole;
    use std::io::Cursor;

    const TWO_CYS: &str = "\
HEADER    TOXIN                                   01-JAN-00   XXXX
ATOM      1  N   CYS A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  CYS A   1      11.639   6.071  -5.147  1.00  0.00           C
ATOM      3  SG  CYS A   1      12.000   7.000  -4.000  1.00  0.00           S
ATOM      4  N   LYS A   2      12.500   5.000  -4.500  1.00  0.00           N1+
ATOM      5  CA ALYS A   2      13.000   4.000  -4.000  0.60  0.00           C
ATOM      6  CA BLYS A   2      13.100   4.100  -4.100  0.40  0.00           C
ATOM      7  SG  CYS A   3      14.000   7.000  -4.000  1.00  0.00           S
HETATM    8  O   HOH A 101      20.000  20.000  20.000  1.00  0.00           O
TER
END
ATOM      9  CA  GLY A   4       0.000   0.000   0.000  1.00  0.00           C
";

    fn read(text: &str) -> Result<MolecularSystem, PdbError> {
        PdbFile::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_atoms_in_file_order_and_groups_residues() {
        let system = read(TWO_CYS).unwrap();
        let names: Vec<_> = system.atoms_iter().map(|(_, a)| a.name.clone()).collect();
        assert_eq!(names, vec!["N", "CA", "SG", "N", "CA", "SG"]);
        assert_eq!(system.residue_count(), 3);
        assert_eq!(system.cysteine_sulfurs().len(), 2);
    }

    #[test]
    fn keeps_first_alternate_location_only() {
        let system = read(TWO_CYS).unwrap();
        let lys_ca: Vec<_> = system
            .atoms_iter()
            .filter(|(id, a)| {
                a.name == "CA" && system.atom_context(*id).unwrap().1.name == "LYS"
            })
            .map(|(_, a)| a.position.x)
            .collect();
        assert_eq!(lys_ca, vec![13.0]);
    }

    #[test]
    fn water_is_skipped_by_default_and_kept_on_request() {
        let default = read(TWO_CYS).unwrap();
        assert!(default.atoms_iter().all(|(_, a)| a.role != AtomRole::Water));

        let options = PdbReadOptions {
            keep_water: true,
            keep_hetero: true,
        };
        let with_water =
            PdbFile::read_with(&mut Cursor::new(TWO_CYS.as_bytes()), &options).unwrap();
        assert_eq!(with_water.atom_count(), 7);
        assert!(with_water.atoms_iter().any(|(_, a)| a.role == AtomRole::Water));
    }

    #[test]
    fn parses_element_formal_charge_and_roles() {
        let system = read(TWO_CYS).unwrap();
        let atoms: Vec<_> = system.atoms_iter().map(|(_, a)| a.clone()).collect();
        assert_eq!(atoms[2].element, "S");
        assert_eq!(atoms[2].role, AtomRole::Sidechain);
        assert_eq!(atoms[1].role, AtomRole::Backbone);
        assert_eq!(atoms[3].partial_charge, Some(1.0));
        assert_eq!(atoms[0].partial_charge, None);
        assert_eq!(atoms[4].occupancy, 0.6);
    }

    #[test]
    fn stops_at_end_record() {
        let system = read(TWO_CYS).unwrap();
        assert!(system.atoms_iter().all(|(_, a)| a.serial != 9));
    }

    #[test]
    fn insertion_codes_produce_distinct_residues() {
        let text = "\
ATOM      1  CA  ALA A  10       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  ALA A  10A      3.800   0.000   0.000  1.00  0.00           C
";
        let system = read(text).unwrap();
        assert_eq!(system.residue_count(), 2);
        let numbers: Vec<_> = system.residues_iter().map(|(_, r)| r.number.to_string()).collect();
        assert_eq!(numbers, vec!["10", "10A"]);
    }

    #[test]
    fn blank_chain_defaults_to_a() {
        let text =
            "ATOM      1  CA  ALA    10       0.000   0.000   0.000  1.00  0.00           C\n";
        let system = read(text).unwrap();
        assert!(system.find_chain_by_id('A').is_some());
    }

    #[test]
    fn short_line_is_an_error() {
        let result = read("ATOM      1  CA  ALA A   1       0.000   0.000\n");
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::LineTooShort
            })
        ));
    }

    #[test]
    fn invalid_coordinate_reports_columns() {
        let text =
            "ATOM      1  CA  ALA A   1       abcde   0.000   0.000  1.00  0.00           C\n";
        match read(text) {
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::InvalidFloat { columns, .. },
                ..
            }) => assert_eq!(columns, "31-38"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_atom_records_is_an_error() {
        assert!(matches!(
            read("HEADER    NOTHING\nEND\n"),
            Err(PdbError::MissingRecord(_))
        ));
    }

    #[test]
    fn formal_charge_column_parsing() {
        assert_eq!(parse_formal_charge("2+"), Some(2.0));
        assert_eq!(parse_formal_charge("1-"), Some(-1.0));
        assert_eq!(parse_formal_charge(""), None);
        assert_eq!(parse_formal_charge("x"), None);
    }
}
