use crate::error::{CliError, Result};
use nalgebra::Vector3;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toxgraph::core::models::graph::{Granularity, ParseGranularityError};
use toxgraph::core::properties::registry::ResiduePropertyTable;
use toxgraph::engine::config::{
    AnalysisConfig, DipoleConfig, EdgeStrengths, GraphConfigBuilder, MetricsConfig,
};
use tracing::debug;

const DEFAULT_ATOM_DISTANCE_THRESHOLD: f64 = 4.5;
const DEFAULT_RESIDUE_DISTANCE_THRESHOLD: f64 = 8.0;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
struct PartialEdgeStrengths {
    distance: Option<f64>,
    peptide: Option<f64>,
    disulfide: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialGraphConfig {
    granularity: Option<String>,
    distance_threshold: Option<f64>,
    disulfide_max_distance: Option<f64>,
    include_peptide_bonds: Option<bool>,
    include_disulfides: Option<bool>,
    peptide_weight: Option<f64>,
    disulfide_weight: Option<f64>,
    properties: Option<PathBuf>,
    strengths: Option<PartialEdgeStrengths>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialMetricsConfig {
    top_n: Option<usize>,
    tie_tolerance: Option<f64>,
    surface_sasa_threshold: Option<f64>,
    long_contact_separation: Option<isize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialDipoleConfig {
    mass_weighted: Option<bool>,
    reference_axis: Option<[f64; 3]>,
}

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub granularity: Option<Granularity>,
    pub distance_threshold: Option<f64>,
    pub disulfide_max_distance: Option<f64>,
    pub mass_weighted: bool,
    pub properties: Option<&'a Path>,
    pub set_values: &'a [String],
}

/// Configuration as read from a TOML file; every value is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAnalysisConfig {
    graph: Option<PartialGraphConfig>,
    metrics: Option<PartialMetricsConfig>,
    dipole: Option<PartialDipoleConfig>,
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration: CLI flags, then `-S` overrides, then the
    /// file, then built-in defaults.
    pub fn merge_with_cli(mut self, overrides: &CliOverrides) -> Result<AnalysisConfig> {
        self.apply_set_values(overrides.set_values)?;

        let graph_file = self.graph.take().unwrap_or_default();
        let metrics_file = self.metrics.take().unwrap_or_default();
        let dipole_file = self.dipole.take().unwrap_or_default();

        let granularity = match (overrides.granularity, graph_file.granularity.as_deref()) {
            (Some(granularity), _) => granularity,
            (None, Some(name)) => name
                .parse()
                .map_err(|e: ParseGranularityError| CliError::Config(e.to_string()))?,
            (None, None) => Granularity::default(),
        };
        let distance_threshold = overrides
            .distance_threshold
            .or(graph_file.distance_threshold)
            .unwrap_or(match granularity {
                Granularity::Atom => DEFAULT_ATOM_DISTANCE_THRESHOLD,
                Granularity::Residue => DEFAULT_RESIDUE_DISTANCE_THRESHOLD,
            });

        let properties_path = overrides
            .properties
            .map(Path::to_path_buf)
            .or(graph_file.properties);
        let properties = match properties_path {
            Some(path) => {
                ResiduePropertyTable::load(&path).map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?
            }
            None => ResiduePropertyTable::builtin(),
        };

        let mut builder = GraphConfigBuilder::new()
            .granularity(granularity)
            .distance_threshold(distance_threshold)
            .properties(properties);
        if let Some(distance) = overrides
            .disulfide_max_distance
            .or(graph_file.disulfide_max_distance)
        {
            builder = builder.disulfide_max_distance(distance);
        }
        if let Some(include) = graph_file.include_peptide_bonds {
            builder = builder.include_peptide_bonds(include);
        }
        if let Some(include) = graph_file.include_disulfides {
            builder = builder.include_disulfides(include);
        }
        if let Some(weight) = graph_file.peptide_weight {
            builder = builder.peptide_weight(weight);
        }
        if let Some(weight) = graph_file.disulfide_weight {
            builder = builder.disulfide_weight(weight);
        }
        if let Some(strengths) = graph_file.strengths {
            builder = builder.strengths(Self::merge_strengths(strengths));
        }
        let graph = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

        let metrics_defaults = MetricsConfig::default();
        let metrics = MetricsConfig {
            top_n: metrics_file.top_n.unwrap_or(metrics_defaults.top_n),
            tie_tolerance: metrics_file
                .tie_tolerance
                .unwrap_or(metrics_defaults.tie_tolerance),
            surface_sasa_threshold: metrics_file
                .surface_sasa_threshold
                .unwrap_or(metrics_defaults.surface_sasa_threshold),
            long_contact_separation: metrics_file
                .long_contact_separation
                .unwrap_or(metrics_defaults.long_contact_separation),
        };

        let dipole_defaults = DipoleConfig::default();
        let dipole = DipoleConfig {
            mass_weighted: overrides.mass_weighted
                || dipole_file
                    .mass_weighted
                    .unwrap_or(dipole_defaults.mass_weighted),
            reference_axis: dipole_file
                .reference_axis
                .map(Vector3::from)
                .unwrap_or(dipole_defaults.reference_axis),
        };

        let config = AnalysisConfig {
            graph,
            metrics,
            dipole,
        };
        config
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    fn merge_strengths(partial: PartialEdgeStrengths) -> EdgeStrengths {
        let defaults = EdgeStrengths::default();
        EdgeStrengths {
            distance: partial.distance.unwrap_or(defaults.distance),
            peptide: partial.peptide.unwrap_or(defaults.peptide),
            disulfide: partial.disulfide.unwrap_or(defaults.disulfide),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "graph.granularity" => {
                    self.graph.get_or_insert_with(Default::default).granularity = Some(value_str.to_string());
                }
                "graph.distance-threshold" => {
                    self.graph.get_or_insert_with(Default::default).distance_threshold =
                        Some(parse_value(key, value_str)?);
                }
                "graph.disulfide-max-distance" => {
                    self.graph.get_or_insert_with(Default::default).disulfide_max_distance =
                        Some(parse_value(key, value_str)?);
                }
                "graph.include-peptide-bonds" => {
                    self.graph.get_or_insert_with(Default::default).include_peptide_bonds =
                        Some(parse_value(key, value_str)?);
                }
                "graph.include-disulfides" => {
                    self.graph.get_or_insert_with(Default::default).include_disulfides =
                        Some(parse_value(key, value_str)?);
                }
                "metrics.top-n" => {
                    self.metrics.get_or_insert_with(Default::default).top_n =
                        Some(parse_value(key, value_str)?);
                }
                "metrics.tie-tolerance" => {
                    self.metrics.get_or_insert_with(Default::default).tie_tolerance =
                        Some(parse_value(key, value_str)?);
                }
                "metrics.surface-sasa-threshold" => {
                    self.metrics
                        .get_or_insert_with(Default::default)
                        .surface_sasa_threshold = Some(parse_value(key, value_str)?);
                }
                "metrics.long-contact-separation" => {
                    self.metrics
                        .get_or_insert_with(Default::default)
                        .long_contact_separation = Some(parse_value(key, value_str)?);
                }
                "dipole.mass-weighted" => {
                    self.dipole.get_or_insert_with(Default::default).mass_weighted =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}
