//! resistome-common — Shared entities and errors used across all Resistome crates.

pub mod error;
pub mod entities;

// Re-export commonly used types
pub use error::{ResistomeError, Result, TableKind};
pub use entities::{CriterionSet, DetectionRecord, MatchKind, MatchedPair, ReferenceMatrix, ReferenceRow};
