//! resistome-ranker — MCDA risk scoring engine for AMR detections.
//!
//! Stages, each a pure transform over immutable inputs:
//! 1. `reference`: index the MCDA matrix by normalised species
//! 2. `matcher`: resolve detections against the index (direct, then alternate drug class)
//! 3. `scorer`: per-pair composite scores
//! 4. `aggregate`: sample, species and drug-class risk views
//!
//! `pipeline::run_pipeline` chains them; `export` writes the resulting tables.

pub mod reference;
pub mod matcher;
pub mod scorer;
pub mod aggregate;
pub mod export;
pub mod pipeline;

pub use aggregate::{FacetMetric, RiskReport};
pub use pipeline::run_pipeline;
