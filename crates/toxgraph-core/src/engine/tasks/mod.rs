//! Algorithmic units of the engine.
//!
//! Each submodule exposes a `run` entry point (plus smaller helpers where other
//! tasks or callers need them). Tasks take already-parsed inputs and return plain
//! records; they hold no state between calls.

pub mod centrality;
pub mod community;
pub mod dipole;
pub mod disulfide;
pub mod graph_build;
pub mod metrics;
pub mod motifs;
pub mod segmentation;
