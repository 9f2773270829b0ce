//! Detection → reference resolution.
//!
//! For a (species, drug class) pair the first reference row of that species
//! whose canonical drug class matches wins. Only when no row matches directly
//! are the alternate drug classes consulted, again first row wins. Pairs that
//! resolve neither way are dropped without error.

use resistome_common::{DetectionRecord, MatchKind, MatchedPair};
use resistome_ingestion::{extract_species, normalize_drug_class, SpeciesSlots};
use serde::Serialize;
use tracing::debug;

use crate::reference::{IndexedRow, ReferenceIndex};

/// Diagnostic counters. They never influence which pairs are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub records_seen: usize,
    pub skipped_negative_rpm: usize,
    pub skipped_no_species: usize,
    pub skipped_missing_sample: usize,
    pub skipped_blank_drug_class: usize,
    pub direct_matches: usize,
    pub fallback_matches: usize,
    pub unresolved_pairs: usize,
}

/// Matched pairs plus counters.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub pairs: Vec<MatchedPair>,
    pub stats: MatchStats,
}

/// Resolve one normalised (species, drug class) pair.
pub fn resolve<'a>(index: &'a ReferenceIndex, species_clean: &str, drug_class_clean: &str) -> Option<(&'a IndexedRow, MatchKind)> {
    let rows = index.rows_for(species_clean);

    if let Some(row) = rows
        .iter()
        .find(|r| r.drug_class_clean.as_deref() == Some(drug_class_clean))
    {
        return Some((row, MatchKind::Direct));
    }

    rows.iter()
        .find(|r| r.has_alternate(drug_class_clean))
        .map(|row| (row, MatchKind::Fallback))
}

/// Match every detection's species slots against the index.
///
/// Records are skipped as a whole when `rpm` is negative, when no species can
/// be extracted, when the sample name is missing, or when the drug class is
/// blank after normalisation.
pub fn match_detections(detections: &[DetectionRecord], index: &ReferenceIndex) -> MatchOutcome {
    let slots = SpeciesSlots::from_lists(
        detections
            .iter()
            .map(|d| extract_species(d.read_species.as_deref()))
            .collect(),
    );
    debug!("Species slots ({}): {}", slots.width(), slots.column_names().join(", "));

    let mut outcome = MatchOutcome::default();
    for (i, detection) in detections.iter().enumerate() {
        outcome.stats.records_seen += 1;
        let species_slots = slots.row(i).unwrap_or(&[]);
        match_record(detection, species_slots, index, &mut outcome);
    }

    debug!("Match stats: {:?}", outcome.stats);
    outcome
}

fn match_record(
    detection: &DetectionRecord,
    species_slots: &[Option<String>],
    index: &ReferenceIndex,
    outcome: &mut MatchOutcome,
) {
    let stats = &mut outcome.stats;

    if detection.rpm < 0.0 {
        stats.skipped_negative_rpm += 1;
        return;
    }
    if species_slots.iter().all(Option::is_none) {
        stats.skipped_no_species += 1;
        return;
    }
    let Some(sample_name) = detection.sample_name.as_deref() else {
        stats.skipped_missing_sample += 1;
        return;
    };
    let Some(drug_class) = normalize_drug_class(detection.drug_class.as_deref()).filter(|dc| !dc.is_empty())
    else {
        stats.skipped_blank_drug_class += 1;
        return;
    };

    for species in species_slots.iter().flatten() {
        match resolve(index, species, &drug_class) {
            Some((row, kind)) => {
                match kind {
                    MatchKind::Direct => stats.direct_matches += 1,
                    MatchKind::Fallback => stats.fallback_matches += 1,
                }
                outcome.pairs.push(MatchedPair {
                    sample_name: sample_name.to_string(),
                    species_clean: species.clone(),
                    drug_class_clean: drug_class.clone(),
                    rpm: detection.rpm,
                    scores: row.scores.clone(),
                    kind,
                });
            }
            None => stats.unresolved_pairs += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resistome_common::{DetectionRecord, ReferenceRow};
    use resistome_test_utils::{detection, reference_matrix, reference_row, scores};

    fn rows() -> Vec<ReferenceRow> {
        vec![
            reference_row("Ecoli", "quinolone", &[], scores(9.0, 9.0)),
            reference_row("Ecoli", "fluoroquinolone", &["quinolone"], scores(1.0, 2.0)),
            reference_row("Ecoli", "aminocoumarin", &["quinolone", "tetracycline"], scores(5.0, 5.0)),
            reference_row("Kpneumoniae", "carbapenem", &["penem"], scores(3.0, 0.0)),
            reference_row("Kpneumoniae", "monobactam", &["penem"], scores(4.0, 0.0)),
        ]
    }

    fn index() -> ReferenceIndex {
        ReferenceIndex::build(&reference_matrix(rows()))
    }

    #[test]
    fn test_direct_match_preferred_over_alternate() {
        let index = index();
        // Row 0 matches directly; row 1 lists it as an alternate and comes later
        let (row, kind) = resolve(&index, "ecoli", "quinolone").unwrap();
        assert_eq!(kind, MatchKind::Direct);
        assert_eq!(row.row_index, 0);
    }

    #[test]
    fn test_direct_match_wins_over_earlier_alternate() {
        // The alternate-bearing row comes first; the later direct row still wins
        let index = ReferenceIndex::build(&reference_matrix(vec![
            reference_row("Ecoli", "fluoroquinolone", &["quinolone"], scores(1.0, 2.0)),
            reference_row("Ecoli", "Quinolone Antibiotic", &[], scores(6.0, 0.0)),
        ]));
        let (row, kind) = resolve(&index, "ecoli", "quinolone").unwrap();
        assert_eq!(kind, MatchKind::Direct);
        assert_eq!(row.row_index, 1);
        assert_eq!(row.scores, scores(6.0, 0.0));
    }

    #[test]
    fn test_fallback_first_row_wins() {
        // Pinned behaviour: with several alternate candidates, matrix order decides.
        let index = index();
        let (row, kind) = resolve(&index, "kpneumoniae", "penem").unwrap();
        assert_eq!(kind, MatchKind::Fallback);
        assert_eq!(row.row_index, 3);

        let (row, kind) = resolve(&index, "ecoli", "tetracycline").unwrap();
        assert_eq!(kind, MatchKind::Fallback);
        assert_eq!(row.row_index, 2);
    }

    #[test]
    fn test_unknown_species_or_class_unresolved() {
        let index = index();
        assert!(resolve(&index, "saureus", "quinolone").is_none());
        assert!(resolve(&index, "ecoli", "glycopeptide").is_none());
    }

    #[test]
    fn test_unrelated_species_does_not_change_outcome() {
        let base = index();
        let unrelated = reference_row("Saureus", "quinolone", &["fluoroquinolone", "penem"], scores(7.0, 7.0));

        let mut front = vec![unrelated.clone()];
        front.extend(rows());
        let mut back = rows();
        back.push(unrelated);

        let pairs = [
            ("ecoli", "quinolone"),
            ("ecoli", "fluoroquinolone"),
            ("ecoli", "aminocoumarin"),
            ("ecoli", "tetracycline"),
            ("ecoli", "glycopeptide"),
            ("kpneumoniae", "carbapenem"),
            ("kpneumoniae", "monobactam"),
            ("kpneumoniae", "penem"),
            ("kpneumoniae", "quinolone"),
        ];
        let outcome = |index: &ReferenceIndex, species: &str, class: &str| {
            resolve(index, species, class).map(|(row, kind)| (row.scores.clone(), kind))
        };

        for extended in [front, back] {
            let extended = ReferenceIndex::build(&reference_matrix(extended));
            for (species, class) in pairs {
                assert_eq!(
                    outcome(&base, species, class),
                    outcome(&extended, species, class),
                    "{species}/{class}"
                );
            }
        }
    }

    #[test]
    fn test_pair_reports_detection_drug_class() {
        let index = index();
        let detections = vec![detection("S1", "Tetracycline Resistance", 2.0, "Ecoli:3")];
        let outcome = match_detections(&detections, &index);
        assert_eq!(outcome.pairs.len(), 1);
        let pair = &outcome.pairs[0];
        assert_eq!(pair.drug_class_clean, "tetracycline");
        assert_eq!(pair.kind, MatchKind::Fallback);
        assert_eq!(pair.scores, scores(5.0, 5.0));
        assert_eq!(outcome.stats.fallback_matches, 1);
    }

    #[test]
    fn test_one_pair_per_resolved_species_slot() {
        let index = index();
        let detections = vec![detection("S1", "carbapenem", 1.5, "Kpneumoniae (chr); Ecoli; Kpneumoniae:2")];
        let outcome = match_detections(&detections, &index);
        assert_eq!(outcome.pairs.len(), 2);
        assert!(outcome.pairs.iter().all(|p| p.species_clean == "kpneumoniae"));
        assert_eq!(outcome.stats.unresolved_pairs, 1);
    }

    #[test]
    fn test_skipped_records() {
        let index = index();
        let mut no_sample = detection("S1", "quinolone", 1.0, "Ecoli");
        no_sample.sample_name = None;
        let detections = vec![
            detection("S1", "quinolone", -1.0, "Ecoli"),
            detection("S1", "quinolone", 1.0, "(plasmid):4"),
            DetectionRecord { drug_class: None, ..detection("S1", "x", 1.0, "Ecoli") },
            detection("S1", "  Resistance ", 1.0, "Ecoli"),
            no_sample,
        ];
        let outcome = match_detections(&detections, &index);
        assert!(outcome.pairs.is_empty());
        assert_eq!(outcome.stats.records_seen, 5);
        assert_eq!(outcome.stats.skipped_negative_rpm, 1);
        assert_eq!(outcome.stats.skipped_no_species, 1);
        assert_eq!(outcome.stats.skipped_blank_drug_class, 2);
        assert_eq!(outcome.stats.skipped_missing_sample, 1);
    }

    #[test]
    fn test_zero_rpm_is_kept() {
        let index = index();
        let outcome = match_detections(&[detection("S1", "fluoroquinolone", 0.0, "Ecoli")], &index);
        assert_eq!(outcome.pairs.len(), 1);
    }
}
