//! Species extraction from the `read_species` annotation field.
//!
//! The field is a `;`-separated list of fragments such as
//! `"Escherichia coli (chromosome):12; Klebsiella pneumoniae"`. Each fragment
//! loses its parenthesised notes and everything after the first `:`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::cells::is_missing_token;

lazy_static! {
    static ref PAREN_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref COLON_TAIL_RE: Regex = Regex::new(r":.*").unwrap();
}

/// Ordered, lower-cased species names from one `read_species` value.
///
/// Fragments that are empty after cleaning are dropped, as are fragments that
/// spell a missing value (a stringified `nan` from upstream tooling).
pub fn extract_species(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return vec![];
    };

    text.split(';')
        .filter_map(|fragment| {
            let no_notes = PAREN_RE.replace_all(fragment, "");
            let no_tail = COLON_TAIL_RE.replace(&no_notes, "");
            let name = no_tail.trim();
            if name.is_empty() || is_missing_token(name) {
                None
            } else {
                Some(name.to_lowercase())
            }
        })
        .collect()
}

/// Extracted species laid out as fixed-width slots.
///
/// The width is the longest species list over all records; shorter rows are
/// padded with `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesSlots {
    width: usize,
    rows: Vec<Vec<Option<String>>>,
}

impl SpeciesSlots {
    /// Build slots from per-record species lists, preserving record order.
    pub fn from_lists(lists: Vec<Vec<String>>) -> Self {
        let width = lists.iter().map(Vec::len).max().unwrap_or(0);
        let rows = lists
            .into_iter()
            .map(|list| {
                let mut row: Vec<Option<String>> = list.into_iter().map(Some).collect();
                row.resize(width, None);
                row
            })
            .collect();
        Self { width, rows }
    }

    /// Number of slot columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Slots for record `index`, or `None` when out of range.
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Slot column names in the `read_species_01`, `read_species_02`, … form.
    pub fn column_names(&self) -> Vec<String> {
        (1..=self.width).map(|i| format!("read_species_{i:02}")).collect()
    }
}
