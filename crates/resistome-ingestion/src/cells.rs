//! Cell-level null handling.
//!
//! Spreadsheet exports spell a missing value many ways. They all collapse to
//! `None` here and nowhere else.

/// Tokens read as a missing value (the common CSV/pandas NA spellings).
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

/// Map a raw cell to `None` when it holds a missing-value token.
/// Present values are returned untrimmed.
pub fn cell_value(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(s) if !is_missing_token(s) => Some(s.to_string()),
        _ => None,
    }
}
