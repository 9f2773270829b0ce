//! Aggregate risk views over matched pairs.
//!
//! All groupings average or sum; duplicate pairs are expected and never
//! deduplicated. Tables are ordered by their group keys and pivot columns are
//! sorted, so output is deterministic for a given input.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use resistome_common::{CriterionSet, MatchedPair};
use serde::Serialize;

use crate::matcher::MatchStats;
use crate::scorer::{composite_score, log_scale, mcda_score, CriterionMeans};

// ── Species × drug class ─────────────────────────────────────────────────────

/// Per-criterion means for one (species, drug class).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McdaScoreRow {
    pub species: String,
    pub drug_class: String,
    pub criterion_means: Vec<f64>,
    pub mcda_score: f64,
}

/// Species × drug-class mean-score table.
///
/// Each criterion is averaged independently across every matched pair of the
/// group; `mcda_score` is the sum of those means.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct McdaScoreTable {
    pub criteria: CriterionSet,
    pub rows: Vec<McdaScoreRow>,
}

impl McdaScoreTable {
    pub fn build(pairs: &[MatchedPair], criteria: &CriterionSet) -> Self {
        let mut groups: BTreeMap<(&str, &str), CriterionMeans> = BTreeMap::new();
        for pair in pairs {
            groups
                .entry((pair.species_clean.as_str(), pair.drug_class_clean.as_str()))
                .or_insert_with(|| CriterionMeans::new(criteria.len()))
                .add(&pair.scores);
        }

        let rows = groups
            .into_iter()
            .map(|((species, drug_class), acc)| {
                let criterion_means = acc.means();
                McdaScoreRow {
                    species: species.to_string(),
                    drug_class: drug_class.to_string(),
                    mcda_score: mcda_score(&criterion_means),
                    criterion_means,
                }
            })
            .collect();

        Self { criteria: criteria.clone(), rows }
    }

    /// MCDA score for a (species, drug class), if any pair produced it.
    pub fn mcda_score(&self, species: &str, drug_class: &str) -> Option<f64> {
        self.rows
            .binary_search_by(|r| (r.species.as_str(), r.drug_class.as_str()).cmp(&(species, drug_class)))
            .ok()
            .map(|i| self.rows[i].mcda_score)
    }
}

// ── Sample × species × drug class, detailed ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRow {
    pub sample_name: String,
    pub species: String,
    pub drug_class: String,
    pub criterion_means: Vec<f64>,
    /// Summed rpm of the group.
    pub rpm: f64,
    pub mcda_score: f64,
    pub cumulative_risk_score: f64,
}

/// Detailed MCDA export: criterion means and rpm sum per
/// (sample, species, drug class), scored within the group itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailedTable {
    pub criteria: CriterionSet,
    pub rows: Vec<DetailedRow>,
}

impl DetailedTable {
    pub fn build(pairs: &[MatchedPair], criteria: &CriterionSet) -> Self {
        let mut groups: BTreeMap<(&str, &str, &str), (CriterionMeans, f64)> = BTreeMap::new();
        for pair in pairs {
            let key = (
                pair.sample_name.as_str(),
                pair.species_clean.as_str(),
                pair.drug_class_clean.as_str(),
            );
            let (acc, rpm) = groups
                .entry(key)
                .or_insert_with(|| (CriterionMeans::new(criteria.len()), 0.0));
            acc.add(&pair.scores);
            *rpm += pair.rpm;
        }

        let rows = groups
            .into_iter()
            .map(|((sample, species, drug_class), (acc, rpm))| {
                let criterion_means = acc.means();
                let score = mcda_score(&criterion_means);
                DetailedRow {
                    sample_name: sample.to_string(),
                    species: species.to_string(),
                    drug_class: drug_class.to_string(),
                    criterion_means,
                    rpm,
                    mcda_score: score,
                    cumulative_risk_score: rpm * score,
                }
            })
            .collect();

        Self { criteria: criteria.clone(), rows }
    }
}

// ── Sample × drug class pivot ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub sample_name: String,
    /// One value per pivot drug-class column.
    pub values: Vec<f64>,
    pub total_risk_score: f64,
    pub average_risk_score: f64,
}

/// Sample × drug-class risk matrix.
///
/// A cell is the mean composite score of the sample's pairs for that drug
/// class. Columns are every reported drug class plus every class known to the
/// reference matrix; absent cells are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskPivot {
    pub drug_classes: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl RiskPivot {
    pub fn build(pairs: &[MatchedPair], known_drug_classes: &BTreeSet<String>) -> Self {
        let mut groups: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        for pair in pairs {
            let (sum, n) = groups
                .entry((pair.sample_name.as_str(), pair.drug_class_clean.as_str()))
                .or_insert((0.0, 0));
            *sum += composite_score(pair);
            *n += 1;
        }

        let mut columns: BTreeSet<&str> = known_drug_classes.iter().map(String::as_str).collect();
        columns.extend(groups.keys().map(|&(_, dc)| dc));
        let drug_classes: Vec<String> = columns.iter().map(|c| c.to_string()).collect();

        let mut by_sample: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for ((sample, dc), (sum, n)) in &groups {
            let values = by_sample
                .entry(*sample)
                .or_insert_with(|| vec![0.0; drug_classes.len()]);
            if let Ok(col) = drug_classes.binary_search_by(|c| c.as_str().cmp(dc)) {
                values[col] = sum / *n as f64;
            }
        }

        let rows = by_sample
            .into_iter()
            .map(|(sample, values)| {
                let total: f64 = values.iter().sum();
                let average = if values.is_empty() { 0.0 } else { total / values.len() as f64 };
                PivotRow {
                    sample_name: sample.to_string(),
                    values,
                    total_risk_score: total,
                    average_risk_score: average,
                }
            })
            .collect();

        Self { drug_classes, rows }
    }

    /// Cell value for (sample, drug class); `None` when either is not in the pivot.
    pub fn value(&self, sample: &str, drug_class: &str) -> Option<f64> {
        let col = self.drug_classes.iter().position(|c| c == drug_class)?;
        let row = self.rows.iter().find(|r| r.sample_name == sample)?;
        row.values.get(col).copied()
    }

    /// Samples ordered by total risk, highest first.
    pub fn ranked_totals(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .rows
            .iter()
            .map(|r| (r.sample_name.as_str(), r.total_risk_score))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Drug-class cells on the `log10(x + 1)` display scale; totals are not carried.
    pub fn log_scaled(&self) -> LogRiskPivot {
        LogRiskPivot {
            drug_classes: self.drug_classes.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| (r.sample_name.clone(), r.values.iter().copied().map(log_scale).collect()))
                .collect(),
        }
    }
}

/// Log-scaled heatmap values, one row per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogRiskPivot {
    pub drug_classes: Vec<String>,
    pub rows: Vec<(String, Vec<f64>)>,
}

// ── Final aggregated risk ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalRow {
    pub sample_name: String,
    pub species: String,
    pub drug_class: String,
    pub rpm: f64,
    pub mcda_score: f64,
    pub cumulative_risk_score: f64,
}

/// Summed rpm per (sample, species, drug class) joined with the
/// species × drug-class MCDA score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalTable {
    pub rows: Vec<FinalRow>,
}

impl FinalTable {
    pub fn build(pairs: &[MatchedPair], scores: &McdaScoreTable) -> Self {
        let mut groups: BTreeMap<(&str, &str, &str), f64> = BTreeMap::new();
        for pair in pairs {
            *groups
                .entry((
                    pair.sample_name.as_str(),
                    pair.species_clean.as_str(),
                    pair.drug_class_clean.as_str(),
                ))
                .or_insert(0.0) += pair.rpm;
        }

        let rows = groups
            .into_iter()
            .map(|((sample, species, drug_class), rpm)| {
                // Left join: every group has a score since both come from the same pairs
                let score = scores.mcda_score(species, drug_class).unwrap_or(f64::NAN);
                FinalRow {
                    sample_name: sample.to_string(),
                    species: species.to_string(),
                    drug_class: drug_class.to_string(),
                    rpm,
                    mcda_score: score,
                    cumulative_risk_score: rpm * score,
                }
            })
            .collect();

        Self { rows }
    }

    /// One species × sample table per drug class, summing `metric`.
    pub fn facets(&self, metric: FacetMetric) -> Vec<FacetTable> {
        let mut by_class: BTreeMap<&str, Vec<&FinalRow>> = BTreeMap::new();
        for row in &self.rows {
            by_class.entry(row.drug_class.as_str()).or_default().push(row);
        }

        by_class
            .into_iter()
            .map(|(drug_class, rows)| {
                let species: Vec<String> = rows
                    .iter()
                    .map(|r| r.species.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let samples: Vec<String> = rows
                    .iter()
                    .map(|r| r.sample_name.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();

                let mut values = vec![vec![0.0; samples.len()]; species.len()];
                for r in rows {
                    if let (Ok(i), Ok(j)) = (species.binary_search(&r.species), samples.binary_search(&r.sample_name)) {
                        values[i][j] += metric.value(r);
                    }
                }

                FacetTable {
                    drug_class: drug_class.to_string(),
                    metric,
                    species,
                    samples,
                    values,
                }
            })
            .collect()
    }
}

/// Value plotted in per-drug-class facet tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FacetMetric {
    Rpm,
    CumulativeRiskScore,
}

impl FacetMetric {
    pub fn column_name(&self) -> &'static str {
        match self {
            FacetMetric::Rpm => "rpm",
            FacetMetric::CumulativeRiskScore => "cumulative_risk_score",
        }
    }

    fn value(&self, row: &FinalRow) -> f64 {
        match self {
            FacetMetric::Rpm => row.rpm,
            FacetMetric::CumulativeRiskScore => row.cumulative_risk_score,
        }
    }
}

impl fmt::Display for FacetMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for FacetMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rpm" => Ok(FacetMetric::Rpm),
            "cumulative_risk_score" => Ok(FacetMetric::CumulativeRiskScore),
            other => Err(format!("unknown facet metric '{other}' (expected rpm or cumulative_risk_score)")),
        }
    }
}

/// Species (rows) × sample (columns) for one drug class, zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetTable {
    pub drug_class: String,
    pub metric: FacetMetric,
    pub species: Vec<String>,
    pub samples: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskReport {
    pub criteria: CriterionSet,
    pub stats: MatchStats,
    pub mcda_scores: McdaScoreTable,
    pub detailed: DetailedTable,
    pub pivot: RiskPivot,
    pub final_table: FinalTable,
}

impl RiskReport {
    pub fn build(
        pairs: &[MatchedPair],
        criteria: &CriterionSet,
        known_drug_classes: &BTreeSet<String>,
        stats: MatchStats,
    ) -> Self {
        let mcda_scores = McdaScoreTable::build(pairs, criteria);
        let final_table = FinalTable::build(pairs, &mcda_scores);
        Self {
            criteria: criteria.clone(),
            stats,
            detailed: DetailedTable::build(pairs, criteria),
            pivot: RiskPivot::build(pairs, known_drug_classes),
            mcda_scores,
            final_table,
        }
    }
}
