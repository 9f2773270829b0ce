//! resistome-ingestion — Loading and label normalisation for AMR detections
//! and the MCDA reference matrix.
//!
//! Two CSV sources are supported:
//! - `sources::amr_results`: combined AMR results, one row per detection
//! - `sources::mcda_matrix`: the species × drug-class scoring matrix
//!
//! Both loaders validate required columns before reading any row, so a schema
//! failure never yields a partial table.

pub mod cells;
pub mod normalise;
pub mod sources;

pub use normalise::{extract_species, normalize_drug_class, normalize_species, SpeciesSlots};
pub use sources::amr_results::{load_detections, read_detections, REQUIRED_DETECTION_COLUMNS};
pub use sources::mcda_matrix::{load_reference, read_reference, REQUIRED_REFERENCE_COLUMNS};
