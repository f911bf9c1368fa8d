use super::tables;
use crate::core::models::residue::ResidueType;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Physicochemical properties of one residue type.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResidueProperties {
    pub charge: f64,
    pub hydrophobicity: f64,
    #[serde(default, rename = "one-letter")]
    pub one_letter: Option<char>,
}

/// Per-residue property lookup.
///
/// The built-in tables answer every query; entries loaded from a TOML file take
/// precedence for the residue names they list. Protonation and oxidation aliases
/// (`HSP`, `CYX`, ...) resolve to their canonical residue when no override names
/// them directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResiduePropertyTable {
    overrides: HashMap<String, ResidueProperties>,
}

#[derive(Debug, Error)]
pub enum PropertyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl ResiduePropertyTable {
    /// Table backed only by the compiled-in values.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Loads overrides from a TOML file of the form
    ///
    /// ```toml
    /// [LYS]
    /// charge = 1.0
    /// hydrophobicity = -3.9
    /// ```
    pub fn load(path: &Path) -> Result<Self, PropertyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| PropertyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| PropertyLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let raw: HashMap<String, ResidueProperties> = toml::from_str(content)?;
        let overrides = raw
            .into_iter()
            .map(|(name, props)| (name.trim().to_ascii_uppercase(), props))
            .collect();
        Ok(Self { overrides })
    }

    pub fn properties(&self, residue_name: &str) -> ResidueProperties {
        let name = residue_name.trim().to_ascii_uppercase();
        if let Some(props) = self.overrides.get(&name) {
            return *props;
        }
        let canonical = canonical_name(&name);
        if let Some(props) = self.overrides.get(canonical) {
            return *props;
        }
        ResidueProperties {
            charge: tables::formal_charge(canonical),
            hydrophobicity: tables::hydrophobicity(canonical),
            one_letter: Some(tables::one_letter_code(canonical)),
        }
    }

    pub fn charge(&self, residue_name: &str) -> f64 {
        self.properties(residue_name).charge
    }

    pub fn hydrophobicity(&self, residue_name: &str) -> f64 {
        self.properties(residue_name).hydrophobicity
    }

    pub fn one_letter(&self, residue_name: &str) -> char {
        self.properties(residue_name)
            .one_letter
            .unwrap_or(tables::UNKNOWN_ONE_LETTER_CODE)
    }
}

fn canonical_name(name: &str) -> &str {
    match name.parse::<ResidueType>() {
        Ok(residue_type) => residue_type.three_letter(),
        Err(_) => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builtin_table_resolves_aliases() {
        let table = ResiduePropertyTable::builtin();
        assert_eq!(table.charge("HSP"), 0.5);
        assert_eq!(table.charge("cyx"), 0.0);
        assert_eq!(table.hydrophobicity("CYX"), 2.5);
        assert_eq!(table.one_letter("HIE"), 'H');
        assert_eq!(table.one_letter("HOH"), 'X');
    }

    #[test]
    fn overrides_take_precedence() {
        let table = ResiduePropertyTable::from_toml_str(
            r#"
            [his]
            charge = 1.0
            hydrophobicity = -3.2

            [NLE]
            charge = 0.0
            hydrophobicity = 3.8
            one-letter = "L"
            "#,
        )
        .unwrap();
        assert_eq!(table.charge("HIS"), 1.0);
        assert_eq!(table.charge("HSD"), 1.0);
        assert_eq!(table.one_letter("NLE"), 'L');
        assert_eq!(table.charge("LYS"), 1.0);
    }

    #[test]
    fn load_reads_file_and_reports_errors() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("props.toml");
        fs::write(&good, "[ARG]\ncharge = 0.0\nhydrophobicity = 0.0\n").unwrap();
        assert_eq!(ResiduePropertyTable::load(&good).unwrap().charge("ARG"), 0.0);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            ResiduePropertyTable::load(&missing),
            Err(PropertyLoadError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[ARG]\ncolor = \"red\"\n").unwrap();
        assert!(matches!(
            ResiduePropertyTable::load(&bad),
            Err(PropertyLoadError::Toml { .. })
        ));
    }
}
