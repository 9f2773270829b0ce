//! Shared fixtures for Resistome tests.
//!
//! Builders produce in-memory entities; the `*_CSV` constants mirror the
//! on-disk input layouts.

use resistome_common::{CriterionSet, DetectionRecord, ReferenceMatrix, ReferenceRow};

pub use pretty_assertions::assert_eq;

/// The eight standard criterion columns, in reference-matrix order.
pub const STANDARD_CRITERIA: [&str; 8] = [
    "mortality_score",
    "incidence_score",
    "non_fatal_burden_score",
    "transmissibility_score",
    "preventability_score",
    "treatability_score",
    "resistance_trend_score",
    "pipeline_score",
];

pub fn standard_criteria() -> CriterionSet {
    CriterionSet::new(STANDARD_CRITERIA.iter().map(|s| s.to_string()).collect())
}

/// Standard criterion vector with the first two scores set, rest zero.
pub fn scores(mortality: f64, incidence: f64) -> Vec<f64> {
    let mut v = vec![0.0; STANDARD_CRITERIA.len()];
    v[0] = mortality;
    v[1] = incidence;
    v
}

pub fn detection(sample: &str, drug_class: &str, rpm: f64, read_species: &str) -> DetectionRecord {
    DetectionRecord {
        sample_name: Some(sample.to_string()),
        drug_class: Some(drug_class.to_string()),
        rpm,
        read_species: Some(read_species.to_string()),
    }
}

pub fn reference_row(species: &str, drug_class: &str, alternates: &[&str], scores: Vec<f64>) -> ReferenceRow {
    ReferenceRow {
        species: Some(species.to_string()),
        drug_class: Some(drug_class.to_string()),
        alternative_drug_classes: alternates
            .iter()
            .map(|a| if a.is_empty() { None } else { Some(a.to_string()) })
            .collect(),
        scores,
    }
}

pub fn reference_matrix(rows: Vec<ReferenceRow>) -> ReferenceMatrix {
    ReferenceMatrix {
        criteria: standard_criteria(),
        rows,
    }
}

/// Two samples, three detections, one unresolvable species.
pub const DETECTIONS_CSV: &str = "\
sample_name,drug_class,rpm,read_species
S1,Fluoroquinolone Resistance,10,Ecoli(dna):5
S1,beta-lactam antibiotic,2,Ecoli (plasmid):3; Kpneumoniae:1
S2,Quinolone,4,Ecoli;Unknownia sp.
S2,tetracycline,-1,Ecoli
";

/// Reference rows for Ecoli and Kpneumoniae; Ecoli lists `quinolone` as an alternate.
pub const REFERENCE_CSV: &str = "\
species,drug_class,mortality_score,incidence_score,non_fatal_burden_score,transmissibility_score,preventability_score,treatability_score,resistance_trend_score,pipeline_score,alternative_drug_class_1
Ecoli,fluoroquinolone,1,2,0,0,0,0,0,0,quinolone
Ecoli,beta-lactam,1,1,1,0,0,0,0,0,
Kpneumoniae,Beta-lactam,2,2,0,0,0,0,0,0,
Saureus,glycopeptide,3,0,0,0,0,0,0,0,
";
