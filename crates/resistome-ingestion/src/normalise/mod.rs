//! Label normalisation.
//!
//! Two normalisers are provided:
//! - `labels`: canonical species and drug-class keys
//! - `read_species`: species lists parsed from the `read_species` annotation field

pub mod labels;
pub mod read_species;

pub use labels::{normalize_drug_class, normalize_species, QUALIFIER_SUFFIXES};
pub use read_species::{extract_species, SpeciesSlots};
