//! Reference matrix index.
//!
//! Rows are grouped by normalised species. Within a species the source
//! matrix order is kept, since resolution takes the first qualifying row.

use std::collections::{BTreeSet, HashMap, HashSet};

use resistome_common::{CriterionSet, ReferenceMatrix};
use resistome_ingestion::{normalize_drug_class, normalize_species};
use tracing::debug;

/// A reference row with its lookup keys precomputed.
#[derive(Debug, Clone)]
pub struct IndexedRow {
    /// Position in the source matrix (0-based, data rows only).
    pub row_index: usize,
    pub species_clean: String,
    pub drug_class_clean: Option<String>,
    /// Normalised, non-empty alternate drug classes.
    pub alternates: HashSet<String>,
    pub scores: Vec<f64>,
}

impl IndexedRow {
    pub fn has_alternate(&self, drug_class_clean: &str) -> bool {
        self.alternates.contains(drug_class_clean)
    }
}

/// Species → reference rows multi-map plus the set of known drug classes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    criteria: CriterionSet,
    by_species: HashMap<String, Vec<IndexedRow>>,
    drug_classes: BTreeSet<String>,
}

impl ReferenceIndex {
    pub fn build(matrix: &ReferenceMatrix) -> Self {
        let mut by_species: HashMap<String, Vec<IndexedRow>> = HashMap::new();
        let mut drug_classes = BTreeSet::new();

        for (row_index, row) in matrix.rows.iter().enumerate() {
            let drug_class_clean = normalize_drug_class(row.drug_class.as_deref()).filter(|dc| !dc.is_empty());
            if let Some(dc) = &drug_class_clean {
                drug_classes.insert(dc.clone());
            }

            // Rows without a species can never be matched
            let Some(species_clean) = normalize_species(row.species.as_deref()) else {
                continue;
            };

            let alternates = row
                .alternative_drug_classes
                .iter()
                .filter_map(|alt| normalize_drug_class(alt.as_deref()))
                .filter(|alt| !alt.is_empty())
                .collect();

            by_species.entry(species_clean.clone()).or_default().push(IndexedRow {
                row_index,
                species_clean,
                drug_class_clean,
                alternates,
                scores: row.scores.clone(),
            });
        }

        debug!(
            "Reference index: {} species, {} drug classes",
            by_species.len(),
            drug_classes.len()
        );

        Self {
            criteria: matrix.criteria.clone(),
            by_species,
            drug_classes,
        }
    }

    pub fn criteria(&self) -> &CriterionSet {
        &self.criteria
    }

    /// Rows for a normalised species, in matrix order. Empty when unknown.
    pub fn rows_for(&self, species_clean: &str) -> &[IndexedRow] {
        self.by_species
            .get(species_clean)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every canonical drug class in the matrix, sorted.
    pub fn drug_classes(&self) -> &BTreeSet<String> {
        &self.drug_classes
    }

    pub fn species_count(&self) -> usize {
        self.by_species.len()
    }
}
