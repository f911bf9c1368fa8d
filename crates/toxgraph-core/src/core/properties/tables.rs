use phf::{Map, phf_map};

static RESIDUE_FORMAL_CHARGES: Map<&'static str, f64> = phf_map! {
    "ARG" => 1.0,
    "LYS" => 1.0,
    "ASP" => -1.0,
    "GLU" => -1.0,
    "HIS" => 0.5,
};

// Kyte & Doolittle (1982).
static KYTE_DOOLITTLE: Map<&'static str, f64> = phf_map! {
    "ALA" => 1.8, "ARG" => -4.5, "ASN" => -3.5, "ASP" => -3.5, "CYS" => 2.5,
    "GLN" => -3.5, "GLU" => -3.5, "GLY" => -0.4, "HIS" => -3.2, "ILE" => 4.5,
    "LEU" => 3.8, "LYS" => -3.9, "MET" => 1.9, "PHE" => 2.8, "PRO" => -1.6,
    "SER" => -0.8, "THR" => -0.7, "TRP" => -0.9, "TYR" => -1.3, "VAL" => 4.2,
};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
};

static ELEMENT_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008, "D" => 2.014, "C" => 12.011, "N" => 14.007, "O" => 15.999,
    "S" => 32.06, "P" => 30.974, "SE" => 78.971, "FE" => 55.845, "ZN" => 65.38,
    "CA" => 40.078, "MG" => 24.305, "NA" => 22.990, "CL" => 35.45, "K" => 39.098,
    "CU" => 63.546, "MN" => 54.938,
};

/// Mass used for elements missing from the table.
pub const FALLBACK_ELEMENT_MASS: f64 = 12.011;

/// Code reported for residues outside the twenty standard amino acids.
pub const UNKNOWN_ONE_LETTER_CODE: char = 'X';

pub fn formal_charge(residue_name: &str) -> f64 {
    RESIDUE_FORMAL_CHARGES
        .get(residue_name.trim())
        .copied()
        .unwrap_or(0.0)
}

pub fn hydrophobicity(residue_name: &str) -> f64 {
    KYTE_DOOLITTLE
        .get(residue_name.trim())
        .copied()
        .unwrap_or(0.0)
}

pub fn one_letter_code(residue_name: &str) -> char {
    ONE_LETTER_CODES
        .get(residue_name.trim())
        .copied()
        .unwrap_or(UNKNOWN_ONE_LETTER_CODE)
}

pub fn element_mass(element: &str) -> f64 {
    ELEMENT_MASSES
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(FALLBACK_ELEMENT_MASS)
}
