//! End-to-end scoring run: detections + reference matrix → report.

use resistome_common::{DetectionRecord, ReferenceMatrix};
use tracing::info;

use crate::aggregate::RiskReport;
use crate::matcher::match_detections;
use crate::reference::ReferenceIndex;

/// Score detections against the reference matrix.
///
/// Pure: no I/O and no state carried between calls, so repeated runs on the
/// same inputs give identical reports.
pub fn run_pipeline(detections: &[DetectionRecord], reference: &ReferenceMatrix) -> RiskReport {
    let index = ReferenceIndex::build(reference);
    let outcome = match_detections(detections, &index);

    info!(
        "Matched {} species/drug-class pairs from {} detections ({} direct, {} via alternate class, {} unresolved)",
        outcome.pairs.len(),
        outcome.stats.records_seen,
        outcome.stats.direct_matches,
        outcome.stats.fallback_matches,
        outcome.stats.unresolved_pairs
    );

    let report = RiskReport::build(&outcome.pairs, index.criteria(), index.drug_classes(), outcome.stats);
    info!(
        "Report: {} samples × {} drug classes, {} sample/species/drug-class rows",
        report.pivot.rows.len(),
        report.pivot.drug_classes.len(),
        report.final_table.rows.len()
    );
    report
}
