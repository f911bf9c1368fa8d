use super::config::ConfigError;
use crate::core::models::graph::Granularity;
use thiserror::Error;

/// Failures surfaced to callers of the engine.
///
/// Degenerate-but-valid inputs (edgeless graphs, disconnected components, residues
/// with no internal bonds) are not errors: the tasks recover locally and report
/// explicit zeroed values instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input structure: {0}")]
    Input(String),

    #[error("No valid atoms for {context}")]
    EmptyStructure { context: &'static str },

    #[error("Segmentation requires atom granularity, but the graph was built at {0} granularity")]
    UnsupportedGranularity(Granularity),

    #[error(
        "Charge source lists {charge_records} atoms but the structure has {structure_atoms}"
    )]
    ChargeSourceMismatch {
        structure_atoms: usize,
        charge_records: usize,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
