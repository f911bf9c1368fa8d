use crate::core::models::graph::Granularity;
use crate::core::properties::registry::ResiduePropertyTable;
use nalgebra::Vector3;
use thiserror::Error;

pub const DEFAULT_DISULFIDE_MAX_DISTANCE: f64 = 2.2;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_SURFACE_SASA_THRESHOLD: f64 = 20.0;
pub const DEFAULT_LONG_CONTACT_SEPARATION: isize = 5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Relative importance of each edge kind. Must be strictly increasing from
/// distance to disulfide so that the single-edge-per-pair collapse is well defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStrengths {
    pub distance: f64,
    pub peptide: f64,
    pub disulfide: f64,
}

impl Default for EdgeStrengths {
    fn default() -> Self {
        Self {
            distance: 1.0,
            peptide: 2.0,
            disulfide: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub granularity: Granularity,
    pub distance_threshold: f64,
    pub disulfide_max_distance: f64,
    pub include_peptide_bonds: bool,
    pub include_disulfides: bool,
    pub strengths: EdgeStrengths,
    /// Constant weight carried by peptide edges (distance edges carry their length).
    pub peptide_weight: f64,
    /// Constant weight carried by disulfide edges.
    pub disulfide_weight: f64,
    pub properties: ResiduePropertyTable,
}

#[derive(Default)]
pub struct GraphConfigBuilder {
    granularity: Option<Granularity>,
    distance_threshold: Option<f64>,
    disulfide_max_distance: Option<f64>,
    include_peptide_bonds: Option<bool>,
    include_disulfides: Option<bool>,
    strengths: Option<EdgeStrengths>,
    peptide_weight: Option<f64>,
    disulfide_weight: Option<f64>,
    properties: Option<ResiduePropertyTable>,
}

impl GraphConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }
    pub fn distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = Some(threshold);
        self
    }
    pub fn disulfide_max_distance(mut self, distance: f64) -> Self {
        self.disulfide_max_distance = Some(distance);
        self
    }
    pub fn include_peptide_bonds(mut self, include: bool) -> Self {
        self.include_peptide_bonds = Some(include);
        self
    }
    pub fn include_disulfides(mut self, include: bool) -> Self {
        self.include_disulfides = Some(include);
        self
    }
    pub fn strengths(mut self, strengths: EdgeStrengths) -> Self {
        self.strengths = Some(strengths);
        self
    }
    pub fn peptide_weight(mut self, weight: f64) -> Self {
        self.peptide_weight = Some(weight);
        self
    }
    pub fn disulfide_weight(mut self, weight: f64) -> Self {
        self.disulfide_weight = Some(weight);
        self
    }
    pub fn properties(mut self, properties: ResiduePropertyTable) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn build(self) -> Result<GraphConfig, ConfigError> {
        let distance_threshold = self
            .distance_threshold
            .ok_or(ConfigError::MissingParameter("distance_threshold"))?;
        require_positive("distance_threshold", distance_threshold)?;

        let disulfide_max_distance = self
            .disulfide_max_distance
            .unwrap_or(DEFAULT_DISULFIDE_MAX_DISTANCE);
        require_positive("disulfide_max_distance", disulfide_max_distance)?;

        let strengths = self.strengths.unwrap_or_default();
        if !(strengths.distance < strengths.peptide && strengths.peptide < strengths.disulfide) {
            return Err(ConfigError::InvalidParameter {
                name: "strengths",
                reason: format!(
                    "expected distance < peptide < disulfide, got {} / {} / {}",
                    strengths.distance, strengths.peptide, strengths.disulfide
                ),
            });
        }

        let peptide_weight = self.peptide_weight.unwrap_or(1.0);
        require_positive("peptide_weight", peptide_weight)?;
        let disulfide_weight = self.disulfide_weight.unwrap_or(1.0);
        require_positive("disulfide_weight", disulfide_weight)?;

        Ok(GraphConfig {
            granularity: self.granularity.unwrap_or_default(),
            distance_threshold,
            disulfide_max_distance,
            include_peptide_bonds: self.include_peptide_bonds.unwrap_or(true),
            include_disulfides: self.include_disulfides.unwrap_or(true),
            strengths,
            peptide_weight,
            disulfide_weight,
            properties: self.properties.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Length of each ranked top-node list.
    pub top_n: usize,
    /// Absolute tolerance used by every "attains the maximum" check.
    pub tie_tolerance: f64,
    /// Residues with a solvent-accessible area above this value (Å²) count as surface.
    pub surface_sasa_threshold: f64,
    /// Residue-number separation above which a contact is long-range.
    pub long_contact_separation: isize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            surface_sasa_threshold: DEFAULT_SURFACE_SASA_THRESHOLD,
            long_contact_separation: DEFAULT_LONG_CONTACT_SEPARATION,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "tie_tolerance",
                reason: format!("must be finite and non-negative, got {}", self.tie_tolerance),
            });
        }
        if self.long_contact_separation < 0 {
            return Err(ConfigError::InvalidParameter {
                name: "long_contact_separation",
                reason: format!("must be non-negative, got {}", self.long_contact_separation),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DipoleConfig {
    /// Weight the center by element mass instead of taking the plain centroid.
    pub mass_weighted: bool,
    /// Axis the dipole orientation is measured against.
    pub reference_axis: Vector3<f64>,
}

impl Default for DipoleConfig {
    fn default() -> Self {
        Self {
            mass_weighted: false,
            reference_axis: Vector3::z(),
        }
    }
}

impl DipoleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let norm = self.reference_axis.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "reference_axis",
                reason: "must be a finite, non-zero vector".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings for the combined analysis workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub graph: GraphConfig,
    pub metrics: MetricsConfig,
    pub dipole: DipoleConfig,
}

impl AnalysisConfig {
    pub fn new(graph: GraphConfig) -> Self {
        Self {
            graph,
            metrics: MetricsConfig::default(),
            dipole: DipoleConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metrics.validate()?;
        self.dipole.validate()
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite and greater than zero, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_builder_applies_defaults() {
        let config = GraphConfigBuilder::new()
            .distance_threshold(5.0)
            .build()
            .unwrap();
        assert_eq!(config.granularity, Granularity::Atom);
        assert_eq!(config.disulfide_max_distance, 2.2);
        assert!(config.include_peptide_bonds);
        assert!(config.include_disulfides);
        assert_eq!(config.strengths, EdgeStrengths::default());
    }

    #[test]
    fn graph_builder_requires_threshold() {
        assert_eq!(
            GraphConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("distance_threshold")
        );
    }

    #[test]
    fn graph_builder_rejects_non_positive_or_non_finite_threshold() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = GraphConfigBuilder::new().distance_threshold(bad).build();
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidParameter {
                        name: "distance_threshold",
                        ..
                    })
                ),
                "threshold {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn graph_builder_rejects_unordered_strengths() {
        let result = GraphConfigBuilder::new()
            .distance_threshold(5.0)
            .strengths(EdgeStrengths {
                distance: 1.0,
                peptide: 3.0,
                disulfide: 2.0,
            })
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "strengths",
                ..
            })
        ));
    }

    #[test]
    fn dipole_config_rejects_zero_axis() {
        let config = DipoleConfig {
            reference_axis: Vector3::zeros(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(DipoleConfig::default().validate().is_ok());
    }

    #[test]
    fn metrics_config_rejects_negative_tolerance() {
        let config = MetricsConfig {
            tie_tolerance: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(MetricsConfig::default().validate().is_ok());
    }
}
