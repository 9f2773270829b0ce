//! Core data model shared by ingestion and ranking.
//!
//! Missing cells are `None` from the point of ingestion onward; no stage
//! compares against stringified placeholders.

use serde::{Deserialize, Serialize};

/// One AMR finding from the combined results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub sample_name: Option<String>,
    /// Free-text drug class as reported by the AMR tool.
    pub drug_class: Option<String>,
    /// Reads per million.
    pub rpm: f64,
    /// Semicolon-delimited species annotations, e.g. `"Ecoli (dna):90; Kpneumoniae"`.
    pub read_species: Option<String>,
}

/// Ordered list of criterion columns discovered in the reference matrix.
///
/// Every score vector in the pipeline is aligned with this ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionSet {
    names: Vec<String>,
}

impl CriterionSet {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// One species + drug-class row of the MCDA reference matrix, as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub species: Option<String>,
    /// Canonical drug class.
    pub drug_class: Option<String>,
    /// Values of the `alternative_drug_class*` columns, in header order.
    pub alternative_drug_classes: Vec<Option<String>>,
    /// Criterion scores, aligned with the matrix's [`CriterionSet`].
    pub scores: Vec<f64>,
}

/// The reference matrix: criterion set plus rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMatrix {
    pub criteria: CriterionSet,
    pub rows: Vec<ReferenceRow>,
}

/// Which resolution tier produced a [`MatchedPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Reference row's canonical drug class equals the detection's.
    Direct,
    /// Detection's drug class found among the row's alternate classes.
    Fallback,
}

/// A detection × species slot resolved against a reference row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub sample_name: String,
    pub species_clean: String,
    /// The detection's normalised drug class, never the reference row's.
    pub drug_class_clean: String,
    pub rpm: f64,
    pub scores: Vec<f64>,
    pub kind: MatchKind,
}

impl MatchedPair {
    /// Sum of all criterion scores.
    pub fn criteria_sum(&self) -> f64 {
        self.scores.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_set_order_and_lookup() {
        let set = CriterionSet::new(vec![
            "mortality_score".to_string(),
            "incidence_score".to_string(),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.position("incidence_score"), Some(1));
        assert_eq!(set.position("pipeline_score"), None);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["mortality_score", "incidence_score"]);
    }

    #[test]
    fn test_criteria_sum() {
        let pair = MatchedPair {
            sample_name: "S1".to_string(),
            species_clean: "ecoli".to_string(),
            drug_class_clean: "fluoroquinolone".to_string(),
            rpm: 10.0,
            scores: vec![1.0, 2.0, 0.5],
            kind: MatchKind::Direct,
        };
        assert!((pair.criteria_sum() - 3.5).abs() < 1e-9);
    }
}
