use std::fmt;

use thiserror::Error;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Combined AMR results (one row per detection).
    Detections,
    /// MCDA reference matrix.
    Reference,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Detections => f.write_str("AMR results"),
            TableKind::Reference => f.write_str("MCDA matrix"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResistomeError {
    #[error("{table} is missing required columns: {}", .missing.join(", "))]
    Schema {
        table: TableKind,
        missing: Vec<String>,
    },

    #[error("{table} row {row}: column '{column}' is not numeric (value: {value:?})")]
    Numeric {
        table: TableKind,
        /// 1-based data row, header excluded.
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ResistomeError>;
