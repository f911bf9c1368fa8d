use crate::core::io::traits::ChargeSource;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

const ATOM_SECTION_TAG: &str = "!NATOM";
const CHARGE_FIELD_INDEX: usize = 6;

#[derive(Debug, Error)]
pub enum PsfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing required section: {0}")]
    MissingSection(&'static str),
    #[error("Invalid section header on line {line}: '{value}'")]
    InvalidHeader { line: usize, value: String },
    #[error("Invalid charge on line {line} (value: '{value}')")]
    InvalidCharge { line: usize, value: String },
    #[error("Atom record on line {line} has {found} fields, expected at least {expected}")]
    ShortRecord {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("Atom section declares {declared} atoms but ends after {found}")]
    TruncatedSection { declared: usize, found: usize },
}

/// Reader for the atom section of a CHARMM/X-PLOR protein structure file.
///
/// Only the per-atom partial charges (seventh column of each `!NATOM` record) are
/// extracted; bonds, angles and the remaining topology sections are ignored.
pub struct PsfFile;

impl ChargeSource for PsfFile {
    type Error = PsfError;

    fn load_charges(reader: &mut impl BufRead) -> Result<Vec<f64>, Self::Error> {
        let mut lines = reader.lines().enumerate();

        let declared = loop {
            let Some((line_num, line_res)) = lines.next() else {
                return Err(PsfError::MissingSection("NATOM"));
            };
            let line = line_res?;
            if !line.contains(ATOM_SECTION_TAG) {
                continue;
            }
            let count_str = line.split_whitespace().next().unwrap_or("");
            break count_str
                .parse::<usize>()
                .map_err(|_| PsfError::InvalidHeader {
                    line: line_num + 1,
                    value: line.trim().to_string(),
                })?;
        };

        let mut charges = Vec::with_capacity(declared);
        while charges.len() < declared {
            let Some((line_num, line_res)) = lines.next() else {
                break;
            };
            let line = line_res?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                break;
            }
            let value = fields.get(CHARGE_FIELD_INDEX).ok_or(PsfError::ShortRecord {
                line: line_num + 1,
                found: fields.len(),
                expected: CHARGE_FIELD_INDEX + 1,
            })?;
            let charge = value.parse::<f64>().map_err(|_| PsfError::InvalidCharge {
                line: line_num + 1,
                value: value.to_string(),
            })?;
            charges.push(charge);
        }

        if charges.len() != declared {
            return Err(PsfError::TruncatedSection {
                declared,
                found: charges.len(),
            });
        }

        debug!(atoms = declared, "Read PSF atom charges.");
        Ok(charges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMALL_PSF: &str = "\
PSF EXT

         1 !NTITLE
 * toy topology

         3 !NATOM
         1 PROA     1        LYS      N        NH3     -0.300000       14.0070           0
         2 PROA     1        LYS      CA       CT1      0.210000       12.0110           0
         3 PROA     1        LYS      NZ       NH3     -0.300000       14.0070           0

         2 !NBOND: bonds
         1         2         2         3
";

    fn load(text: &str) -> Result<Vec<f64>, PsfError> {
        PsfFile::load_charges(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_charges_in_atom_order() {
        let charges = load(SMALL_PSF).unwrap();
        assert_eq!(charges, vec![-0.3, 0.21, -0.3]);
    }

    #[test]
    fn reads_from_bytes() {
        let charges = PsfFile::load_charges_from_bytes(SMALL_PSF.as_bytes()).unwrap();
        assert_eq!(charges.len(), 3);
    }

    #[test]
    fn missing_atom_section_is_an_error() {
        assert!(matches!(
            load("PSF\n\n 1 !NTITLE\n * nothing\n"),
            Err(PsfError::MissingSection("NATOM"))
        ));
    }

    #[test]
    fn truncated_atom_section_is_an_error() {
        let text = "PSF\n\n 2 !NATOM\n 1 P 1 ALA CA CT1 0.1 12.0 0\n\n";
        assert!(matches!(
            load(text),
            Err(PsfError::TruncatedSection {
                declared: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn malformed_charge_reports_line() {
        let text = "PSF\n 1 !NATOM\n 1 P 1 ALA CA CT1 abc 12.0 0\n";
        match load(text) {
            Err(PsfError::InvalidCharge { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_record_is_an_error() {
        let text = "PSF\n 1 !NATOM\n 1 P 1 ALA\n";
        assert!(matches!(load(text), Err(PsfError::ShortRecord { .. })));
    }
}
