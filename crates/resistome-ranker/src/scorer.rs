//! Composite risk score computation.

use resistome_common::MatchedPair;

/// Composite risk of one matched pair: `rpm × Σ criteria`.
pub fn composite_score(pair: &MatchedPair) -> f64 {
    pair.rpm * pair.criteria_sum()
}

/// MCDA score from per-criterion means: the plain sum of the means.
pub fn mcda_score(criterion_means: &[f64]) -> f64 {
    criterion_means.iter().sum()
}

/// `log10(x + 1)`, the display scale for risk heatmaps. Zero maps to zero.
pub fn log_scale(x: f64) -> f64 {
    (x + 1.0).log10()
}

/// Running per-criterion means over a group of pairs.
#[derive(Debug, Clone)]
pub(crate) struct CriterionMeans {
    sums: Vec<f64>,
    count: usize,
}

impl CriterionMeans {
    pub(crate) fn new(width: usize) -> Self {
        Self { sums: vec![0.0; width], count: 0 }
    }

    pub(crate) fn add(&mut self, scores: &[f64]) {
        for (sum, s) in self.sums.iter_mut().zip(scores) {
            *sum += s;
        }
        self.count += 1;
    }

    pub(crate) fn means(&self) -> Vec<f64> {
        if self.count == 0 {
            return self.sums.clone();
        }
        let n = self.count as f64;
        self.sums.iter().map(|s| s / n).collect()
    }
}
