//! # Workflows Module
//!
//! Public entry points that tie the structure readers, configuration and engine tasks
//! together.
//!
//! The single-purpose functions in [`steps`] (re-exported here) cover one analysis each:
//! graph construction, metrics, dipole and segmentation. [`analyze`] runs all of them on
//! one structure and collects a serializable report, reporting progress as it goes.

pub mod analyze;
pub mod steps;

pub use steps::{
    build_graph, build_graph_with, compute_dipole, compute_dipole_with, compute_metrics,
    compute_metrics_with, load_structure, segment,
};
