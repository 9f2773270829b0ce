//! Species and drug-class key normalisation.
//!
//! Free-text labels from AMR tools and from the reference matrix differ in
//! case, padding and trailing qualifiers ("Fluoroquinolone Resistance" vs
//! "fluoroquinolone"). Both sides go through these functions before any
//! comparison.

use lazy_static::lazy_static;
use regex::Regex;

/// Descriptive words stripped from the end of a drug-class label.
pub const QUALIFIER_SUFFIXES: &[&str] = &["antibiotic", "antibacterial", "resistance", "agent"];

lazy_static! {
    static ref QUALIFIER_RE: Regex =
        Regex::new(&format!(r"\s*({})?$", QUALIFIER_SUFFIXES.join("|"))).unwrap();
}

/// Trimmed, lower-cased species key. Missing input stays `None`.
pub fn normalize_species(text: Option<&str>) -> Option<String> {
    text.map(|s| s.trim().to_lowercase())
}

/// Trimmed, lower-cased drug-class key with one trailing qualifier removed.
///
/// The qualifier is matched at the very end of the string together with any
/// whitespace before it, so `"Beta-lactam antibiotic"` and `"beta-lactam"`
/// produce the same key.
pub fn normalize_drug_class(text: Option<&str>) -> Option<String> {
    let lowered = text?.trim().to_lowercase();
    Some(QUALIFIER_RE.replace(&lowered, "").into_owned())
}
