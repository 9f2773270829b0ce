//! Combined AMR results table.
//!
//! Required columns: `sample_name`, `drug_class`, `rpm`, `read_species`.
//! Other columns are ignored.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use resistome_common::{DetectionRecord, Result, TableKind};
use tracing::{debug, info};

use super::{csv_reader, header_index, numeric_cell, read_headers, require_columns, text_cell};

pub const REQUIRED_DETECTION_COLUMNS: &[&str] = &["sample_name", "drug_class", "rpm", "read_species"];

/// Read detections from any CSV source.
///
/// `rpm` must be numeric on every row; its sign is not checked here.
pub fn read_detections<R: Read>(rdr: R) -> Result<Vec<DetectionRecord>> {
    let mut reader = csv_reader(rdr);
    let headers = read_headers(&mut reader)?;
    require_columns(TableKind::Detections, &headers, REQUIRED_DETECTION_COLUMNS)?;

    let index = header_index(&headers);
    let sample_idx = index["sample_name"];
    let drug_class_idx = index["drug_class"];
    let rpm_idx = index["rpm"];
    let species_idx = index["read_species"];

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        records.push(DetectionRecord {
            sample_name: text_cell(&record, sample_idx),
            drug_class: text_cell(&record, drug_class_idx),
            rpm: numeric_cell(TableKind::Detections, &record, row, "rpm", rpm_idx)?,
            read_species: text_cell(&record, species_idx),
        });
    }

    debug!("Parsed {} detection rows", records.len());
    Ok(records)
}

/// Load detections from a CSV file on disk.
pub async fn load_detections(path: impl AsRef<Path>) -> Result<Vec<DetectionRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read AMR results {:?}", path))?;

    let records = read_detections(content.as_slice())?;
    info!("AMR results validation passed: {} rows from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resistome_common::ResistomeError;

    #[test]
    fn test_reads_rows_with_missing_cells() {
        let csv = "sample_name,drug_class,rpm,read_species,gene\n\
                   S1,Fluoroquinolone Resistance,10,Ecoli(dna):5,gyrA\n\
                   S2,,3.5,nan,\n";
        let records = read_detections(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample_name.as_deref(), Some("S1"));
        assert_eq!(records[0].read_species.as_deref(), Some("Ecoli(dna):5"));
        assert!((records[0].rpm - 10.0).abs() < 1e-9);
        assert_eq!(records[1].drug_class, None);
        assert_eq!(records[1].read_species, None);
    }

    #[test]
    fn test_negative_rpm_is_loaded() {
        let csv = "sample_name,drug_class,rpm,read_species\nS1,tetracycline,-1,Ecoli\n";
        let records = read_detections(csv.as_bytes()).unwrap();
        assert!((records[0].rpm + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let csv = "sample_name,drug_class\nS1,tetracycline\n";
        match read_detections(csv.as_bytes()) {
            Err(ResistomeError::Schema { table, missing }) => {
                assert_eq!(table, TableKind::Detections);
                assert_eq!(missing, vec!["read_species".to_string(), "rpm".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_rpm_rejected() {
        let csv = "sample_name,drug_class,rpm,read_species\nS1,tetracycline,1,Ecoli\nS2,tetracycline,lots,Ecoli\n";
        match read_detections(csv.as_bytes()) {
            Err(ResistomeError::Numeric { row, column, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "rpm");
                assert_eq!(value, "lots");
            }
            other => panic!("expected numeric error, got {other:?}"),
        }
    }
}
