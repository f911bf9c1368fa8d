//! # Engine Module
//!
//! The analysis engine: configuration, error taxonomy, progress reporting, and the
//! algorithmic tasks that turn a parsed [`MolecularSystem`](crate::core::models::system::MolecularSystem)
//! into graphs, descriptors and dipole moments.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Graph construction, metrics and dipole settings, with
//!   validation at build time.
//! - **Error Handling** ([`error`]) - [`EngineError`](error::EngineError), the failures that
//!   reach callers. Degenerate inputs are recovered inside the tasks instead.
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends.
//! - **Tasks** ([`tasks`]) - Disulfide detection, graph construction, centrality, community
//!   detection, metrics aggregation, motif flags, segmentation and the dipole calculator.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
