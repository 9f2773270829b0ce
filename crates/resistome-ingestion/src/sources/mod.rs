//! CSV sources.
//!
//! Shared header handling lives here; each table module owns its column
//! contract and row decoding.

pub mod amr_results;
pub mod mcda_matrix;

use std::collections::HashMap;

use resistome_common::{ResistomeError, Result, TableKind};

use crate::cells::cell_value;

/// Column name → index, first occurrence wins for duplicated headers.
pub(crate) fn header_index(headers: &[String]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (i, name) in headers.iter().enumerate() {
        index.entry(name.as_str()).or_insert(i);
    }
    index
}

/// Read the header row, dropping a UTF-8 byte-order mark if present.
pub(crate) fn read_headers<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    Ok(headers)
}

/// Fail with every missing column when any required column is absent.
pub(crate) fn require_columns(table: TableKind, headers: &[String], required: &[&str]) -> Result<()> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(ResistomeError::Schema { table, missing })
}

/// Text cell at `idx`; short rows read as missing.
pub(crate) fn text_cell(record: &csv::StringRecord, idx: usize) -> Option<String> {
    cell_value(record.get(idx))
}

/// Numeric cell at `idx`. Missing or unparseable values are errors.
pub(crate) fn numeric_cell(
    table: TableKind,
    record: &csv::StringRecord,
    row: usize,
    column: &str,
    idx: usize,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    let numeric_error = || ResistomeError::Numeric {
        table,
        row,
        column: column.to_string(),
        value: raw.to_string(),
    };

    let value = cell_value(Some(raw)).ok_or_else(numeric_error)?;
    value.trim().parse::<f64>().map_err(|_| numeric_error())
}

pub(crate) fn csv_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr)
}
