//! Configuration loading for Resistome.
//! Reads resistome.toml from the current directory or the path in RESISTOME_CONFIG.
//! Every field has a default, so a missing default file is not an error;
//! a path given with `--config` must exist.

use std::path::{Path, PathBuf};

use resistome_ranker::export::{OutputFiles, DETAILED_FILE, FINAL_FILE, LOG_PIVOT_FILE, PIVOT_FILE};
use resistome_ranker::FacetMetric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Combined AMR results CSV.
    pub detections: Option<PathBuf>,
    /// MCDA reference matrix CSV.
    pub reference: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_detailed_file")]
    pub detailed_file: String,
    #[serde(default = "default_pivot_file")]
    pub pivot_file: String,
    #[serde(default = "default_final_file")]
    pub final_file: String,
    #[serde(default)]
    pub write_log_pivot: bool,
    #[serde(default = "default_log_pivot_file")]
    pub log_pivot_file: String,
    /// `rpm` or `cumulative_risk_score`; facets are skipped when unset.
    pub facet_metric: Option<String>,
    #[serde(default = "default_facets_dir")]
    pub facets_dir: String,
    #[serde(default = "bool_true")]
    pub write_summary: bool,
}

fn default_output_dir()     -> PathBuf { PathBuf::from("./results") }
fn default_detailed_file()  -> String { DETAILED_FILE.to_string() }
fn default_pivot_file()     -> String { PIVOT_FILE.to_string() }
fn default_final_file()     -> String { FINAL_FILE.to_string() }
fn default_log_pivot_file() -> String { LOG_PIVOT_FILE.to_string() }
fn default_facets_dir()     -> String { "facets".to_string() }
fn bool_true()              -> bool   { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            detailed_file: default_detailed_file(),
            pivot_file: default_pivot_file(),
            final_file: default_final_file(),
            write_log_pivot: false,
            log_pivot_file: default_log_pivot_file(),
            facet_metric: None,
            facets_dir: default_facets_dir(),
            write_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "resistome=info,warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

mod tests;

impl Config {
    /// Load configuration from `path`, else RESISTOME_CONFIG, else ./resistome.toml.
    /// An explicit `path` must exist; the implicit lookup falls back to defaults
    /// when no file is found. A malformed file is always an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = path {
            return Self::load_file(p);
        }

        let path = PathBuf::from(
            std::env::var("RESISTOME_CONFIG").unwrap_or_else(|_| "resistome.toml".to_string()),
        );
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Output paths, with the directory optionally overridden from the command line.
    pub fn output_files(&self, dir_override: Option<&Path>) -> anyhow::Result<OutputFiles> {
        let out = &self.output;
        let dir = dir_override.unwrap_or(out.dir.as_path());

        let facets = match out.facet_metric.as_deref() {
            Some(m) => {
                let metric = m.parse::<FacetMetric>().map_err(anyhow::Error::msg)?;
                Some((dir.join(&out.facets_dir), metric))
            }
            None => None,
        };

        Ok(OutputFiles {
            detailed: dir.join(&out.detailed_file),
            pivot: dir.join(&out.pivot_file),
            final_table: dir.join(&out.final_file),
            log_pivot: out.write_log_pivot.then(|| dir.join(&out.log_pivot_file)),
            facets,
        })
    }
}
