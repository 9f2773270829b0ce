//! MCDA reference matrix.
//!
//! Required columns are `species`, `drug_class` and the eight standard
//! criterion scores. Any number of `alternative_drug_class*` columns may list
//! synonyms for the row's drug class. Every other column is a criterion and
//! must hold a number on every row.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use resistome_common::{CriterionSet, ReferenceMatrix, ReferenceRow, Result, TableKind};
use tracing::{debug, info};

use super::{csv_reader, header_index, numeric_cell, read_headers, require_columns, text_cell};

pub const REQUIRED_REFERENCE_COLUMNS: &[&str] = &[
    "species",
    "drug_class",
    "mortality_score",
    "incidence_score",
    "non_fatal_burden_score",
    "transmissibility_score",
    "preventability_score",
    "treatability_score",
    "resistance_trend_score",
    "pipeline_score",
];

/// Prefix shared by all synonym columns.
pub const ALTERNATE_PREFIX: &str = "alternative_drug_class";

/// Columns that are never criteria: identifiers and derived keys.
const NON_CRITERION_COLUMNS: &[&str] = &[
    "species",
    "drug_class",
    "species_clean",
    "drug_class_clean",
    "all_drug_classes",
];

/// Criterion columns in header order.
pub fn discover_criteria(headers: &[String]) -> CriterionSet {
    let names = headers
        .iter()
        .filter(|h| !NON_CRITERION_COLUMNS.contains(&h.as_str()))
        .filter(|h| !h.starts_with(ALTERNATE_PREFIX))
        .cloned()
        .collect();
    CriterionSet::new(names)
}

/// Read the reference matrix from any CSV source, preserving row order.
pub fn read_reference<R: Read>(rdr: R) -> Result<ReferenceMatrix> {
    let mut reader = csv_reader(rdr);
    let headers = read_headers(&mut reader)?;
    require_columns(TableKind::Reference, &headers, REQUIRED_REFERENCE_COLUMNS)?;

    let index = header_index(&headers);
    let species_idx = index["species"];
    let drug_class_idx = index["drug_class"];
    let alternate_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with(ALTERNATE_PREFIX))
        .map(|(i, _)| i)
        .collect();

    let criteria = discover_criteria(&headers);
    let criterion_idx: Vec<(&str, usize)> = criteria.iter().map(|c| (c, index[c])).collect();
    debug!(
        "MCDA criteria ({}): {}; {} alternate drug-class columns",
        criteria.len(),
        criteria.names().join(", "),
        alternate_idx.len()
    );

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let scores = criterion_idx
            .iter()
            .map(|&(name, idx)| numeric_cell(TableKind::Reference, &record, row, name, idx))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(ReferenceRow {
            species: text_cell(&record, species_idx),
            drug_class: text_cell(&record, drug_class_idx),
            alternative_drug_classes: alternate_idx.iter().map(|&idx| text_cell(&record, idx)).collect(),
            scores,
        });
    }

    Ok(ReferenceMatrix { criteria, rows })
}

/// Load the reference matrix from a CSV file on disk.
pub async fn load_reference(path: impl AsRef<Path>) -> Result<ReferenceMatrix> {
    let path = path.as_ref();
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read MCDA matrix {:?}", path))?;

    let matrix = read_reference(content.as_slice())?;
    info!(
        "MCDA matrix validation passed: {} rows, {} criteria from {:?}",
        matrix.rows.len(),
        matrix.criteria.len(),
        path
    );
    Ok(matrix)
}
