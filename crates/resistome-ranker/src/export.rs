//! CSV export of the report tables.
//!
//! Column layouts:
//! - detailed: `sample_name, species, drug_class, <criteria…>, rpm, mcda_score, cumulative_risk_score`
//! - pivot: `sample_name, <drug classes…>, Total_Risk_Score, Average_Risk_Score`
//! - final: `sample_name, species, drug_class, rpm, mcda_score, cumulative_risk_score`

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use resistome_common::Result;
use tracing::{info, warn};

use crate::aggregate::{DetailedTable, FacetMetric, FacetTable, FinalTable, LogRiskPivot, RiskPivot, RiskReport};

pub const DETAILED_FILE: &str = "Detailed_MCDA_Data.csv";
pub const PIVOT_FILE: &str = "Risk_Scores_Pivot.csv";
pub const FINAL_FILE: &str = "Final_Aggregated_Risk_Scores.csv";
pub const LOG_PIVOT_FILE: &str = "Log_Risk_Scores_Pivot.csv";

/// Where each table goes. Optional tables are skipped when `None`.
#[derive(Debug, Clone)]
pub struct OutputFiles {
    pub detailed: PathBuf,
    pub pivot: PathBuf,
    pub final_table: PathBuf,
    pub log_pivot: Option<PathBuf>,
    /// Directory receiving one CSV per drug class.
    pub facets: Option<(PathBuf, FacetMetric)>,
}

impl OutputFiles {
    /// Default file names inside `dir`, without optional tables.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detailed: dir.join(DETAILED_FILE),
            pivot: dir.join(PIVOT_FILE),
            final_table: dir.join(FINAL_FILE),
            log_pivot: None,
            facets: None,
        }
    }
}

/// Missing values are written as empty cells.
fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

pub fn write_detailed<W: Write>(table: &DetailedTable, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);

    let mut header = vec!["sample_name", "species", "drug_class"];
    header.extend(table.criteria.iter());
    header.extend(["rpm", "mcda_score", "cumulative_risk_score"]);
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.sample_name.clone(), row.species.clone(), row.drug_class.clone()];
        record.extend(row.criterion_means.iter().copied().map(fmt_float));
        record.push(fmt_float(row.rpm));
        record.push(fmt_float(row.mcda_score));
        record.push(fmt_float(row.cumulative_risk_score));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_pivot<W: Write>(pivot: &RiskPivot, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);

    let mut header = vec!["sample_name"];
    header.extend(pivot.drug_classes.iter().map(String::as_str));
    header.extend(["Total_Risk_Score", "Average_Risk_Score"]);
    wtr.write_record(&header)?;

    for row in &pivot.rows {
        let mut record = vec![row.sample_name.clone()];
        record.extend(row.values.iter().copied().map(fmt_float));
        record.push(fmt_float(row.total_risk_score));
        record.push(fmt_float(row.average_risk_score));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_log_pivot<W: Write>(pivot: &LogRiskPivot, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);

    let mut header = vec!["sample_name"];
    header.extend(pivot.drug_classes.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (sample, values) in &pivot.rows {
        let mut record = vec![sample.clone()];
        record.extend(values.iter().copied().map(fmt_float));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_final<W: Write>(table: &FinalTable, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(["sample_name", "species", "drug_class", "rpm", "mcda_score", "cumulative_risk_score"])?;

    for row in &table.rows {
        wtr.write_record([
            row.sample_name.clone(),
            row.species.clone(),
            row.drug_class.clone(),
            fmt_float(row.rpm),
            fmt_float(row.mcda_score),
            fmt_float(row.cumulative_risk_score),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Species rows × sample columns.
pub fn write_facet<W: Write>(facet: &FacetTable, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);

    let mut header = vec!["species"];
    header.extend(facet.samples.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (species, values) in facet.species.iter().zip(&facet.values) {
        let mut record = vec![species.clone()];
        record.extend(values.iter().copied().map(fmt_float));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn facet_stem(drug_class: &str) -> String {
    drug_class
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

/// File-system-safe name for a drug-class facet.
pub fn facet_file_name(drug_class: &str) -> String {
    format!("{}.csv", facet_stem(drug_class))
}

/// Facet file names in input order, distinct from each other.
///
/// Classes whose safe names collide (`"a/b"` and `"a_b"`) keep the plain name
/// for the first one and get `_2`, `_3`, … for the rest.
pub fn facet_file_names<'a>(drug_classes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    drug_classes
        .into_iter()
        .map(|drug_class| {
            let stem = facet_stem(drug_class);
            let mut name = facet_file_name(drug_class);
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{stem}_{n}.csv");
                n += 1;
            }
            if n > 2 {
                warn!("Facet for '{}' renamed to {} to avoid a file name clash", drug_class, name);
            }
            name
        })
        .collect()
}

/// Write every configured table, creating parent directories. Returns the paths written.
pub fn write_report(report: &RiskReport, files: &OutputFiles) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    write_to(&files.detailed, |f| write_detailed(&report.detailed, f))?;
    written.push(files.detailed.clone());
    write_to(&files.pivot, |f| write_pivot(&report.pivot, f))?;
    written.push(files.pivot.clone());
    write_to(&files.final_table, |f| write_final(&report.final_table, f))?;
    written.push(files.final_table.clone());

    if let Some(path) = &files.log_pivot {
        write_to(path, |f| write_log_pivot(&report.pivot.log_scaled(), f))?;
        written.push(path.clone());
    }

    if let Some((dir, metric)) = &files.facets {
        let facets = report.final_table.facets(*metric);
        let names = facet_file_names(facets.iter().map(|f| f.drug_class.as_str()));
        for (facet, name) in facets.iter().zip(names) {
            let path = dir.join(name);
            write_to(&path, |f| write_facet(facet, f))?;
            written.push(path);
        }
    }

    info!("Wrote {} result tables", written.len());
    Ok(written)
}

fn write_to(path: &Path, write: impl FnOnce(fs::File) -> Result<()>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write(fs::File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resistome_common::{MatchKind, MatchedPair};
    use resistome_test_utils::{scores, standard_criteria};
    use std::collections::BTreeSet;

    fn report() -> RiskReport {
        let pairs = vec![MatchedPair {
            sample_name: "S1".to_string(),
            species_clean: "ecoli".to_string(),
            drug_class_clean: "fluoroquinolone".to_string(),
            rpm: 10.0,
            scores: scores(1.0, 2.0),
            kind: MatchKind::Direct,
        }];
        let known: BTreeSet<String> = ["carbapenem".to_string()].into_iter().collect();
        RiskReport::build(&pairs, &standard_criteria(), &known, Default::default())
    }

    #[test]
    fn test_pivot_csv_layout() {
        let mut buf = Vec::new();
        write_pivot(&report().pivot, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "sample_name,carbapenem,fluoroquinolone,Total_Risk_Score,Average_Risk_Score\nS1,0,30,30,15\n"
        );
    }

    #[test]
    fn test_final_csv_layout() {
        let mut buf = Vec::new();
        write_final(&report().final_table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "sample_name,species,drug_class,rpm,mcda_score,cumulative_risk_score\nS1,ecoli,fluoroquinolone,10,3,30\n"
        );
    }

    #[test]
    fn test_detailed_csv_has_criteria_columns() {
        let mut buf = Vec::new();
        write_detailed(&report().detailed, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("sample_name,species,drug_class,mortality_score,incidence_score"));
        assert!(header.ends_with("pipeline_score,rpm,mcda_score,cumulative_risk_score"));
        assert_eq!(text.lines().nth(1).unwrap(), "S1,ecoli,fluoroquinolone,1,2,0,0,0,0,0,0,10,3,30");
    }

    #[test]
    fn test_facet_file_name_is_safe() {
        assert_eq!(facet_file_name("beta-lactam"), "beta-lactam.csv");
        assert_eq!(facet_file_name("sulfonamide/trimethoprim"), "sulfonamide_trimethoprim.csv");
    }

    #[test]
    fn test_facet_file_names_never_clash() {
        let names = facet_file_names(["a/b", "a_b", "a b", "a_b_2", "c"]);
        assert_eq!(names, vec!["a_b.csv", "a_b_2.csv", "a_b_3.csv", "a_b_2_2.csv", "c.csv"]);
    }

    #[test]
    fn test_colliding_facets_written_separately() {
        let pair = |drug_class: &str, rpm: f64| MatchedPair {
            sample_name: "S1".to_string(),
            species_clean: "ecoli".to_string(),
            drug_class_clean: drug_class.to_string(),
            rpm,
            scores: scores(1.0, 0.0),
            kind: MatchKind::Direct,
        };
        let pairs = vec![pair("sulfonamide/trimethoprim", 1.0), pair("sulfonamide_trimethoprim", 2.0)];
        let report = RiskReport::build(&pairs, &standard_criteria(), &BTreeSet::new(), Default::default());

        let dir = tempfile::tempdir().unwrap();
        let mut files = OutputFiles::in_dir(dir.path());
        files.facets = Some((dir.path().join("facets"), FacetMetric::CumulativeRiskScore));

        let written = write_report(&report, &files).unwrap();
        assert_eq!(written.len(), 5);
        let unique: BTreeSet<_> = written.iter().collect();
        assert_eq!(unique.len(), written.len());

        let slash = fs::read_to_string(dir.path().join("facets/sulfonamide_trimethoprim.csv")).unwrap();
        let underscore = fs::read_to_string(dir.path().join("facets/sulfonamide_trimethoprim_2.csv")).unwrap();
        assert_eq!(slash, "species,S1\necoli,1\n");
        assert_eq!(underscore, "species,S1\necoli,2\n");
    }

    #[test]
    fn test_write_report_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = OutputFiles::in_dir(dir.path().join("out"));
        files.log_pivot = Some(dir.path().join("out").join(LOG_PIVOT_FILE));
        files.facets = Some((dir.path().join("out").join("facets"), FacetMetric::CumulativeRiskScore));

        let written = write_report(&report(), &files).unwrap();
        assert_eq!(written.len(), 5);
        for path in &written {
            assert!(path.exists(), "{path:?} missing");
        }
        let facet = fs::read_to_string(dir.path().join("out/facets/fluoroquinolone.csv")).unwrap();
        assert_eq!(facet, "species,S1\necoli,30\n");
    }
}
