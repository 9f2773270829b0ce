//! Resistome — MCDA risk scoring for AMR detections in metagenomic samples.
//! Entry point for the `resistome` binary.
//!
//! Usage:
//!   resistome score --detections <csv> --reference <csv> [--out <dir>] [--log-pivot] [--facets <metric>]
//!   resistome validate --detections <csv> --reference <csv>

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use resistome_common::{DetectionRecord, ReferenceMatrix};
use resistome_ingestion::{load_detections, load_reference};
use resistome_ranker::export::write_report;
use resistome_ranker::{run_pipeline, FacetMetric, RiskReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resistome")]
#[command(version)]
#[command(about = "Prioritise AMR risks in metagenomic samples with an MCDA reference matrix", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to $RESISTOME_CONFIG, then ./resistome.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score detections and write the result tables
    Score {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write the log10(x + 1) risk pivot
        #[arg(long)]
        log_pivot: bool,

        /// Write per-drug-class species × sample tables of this metric
        /// (rpm or cumulative_risk_score)
        #[arg(long)]
        facets: Option<FacetMetric>,

        /// Number of top-risk samples to log
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Check both input tables without scoring
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Combined AMR results CSV
    #[arg(short, long)]
    detections: Option<PathBuf>,

    /// MCDA reference matrix CSV
    #[arg(short, long)]
    reference: Option<PathBuf>,
}

impl InputArgs {
    fn resolve<'a>(&'a self, config: &'a config::Config) -> anyhow::Result<(&'a Path, &'a Path)> {
        let detections = self
            .detections
            .as_deref()
            .or(config.inputs.detections.as_deref())
            .context("No AMR results file given (use --detections or [inputs].detections)")?;
        let reference = self
            .reference
            .as_deref()
            .or(config.inputs.reference.as_deref())
            .context("No MCDA matrix file given (use --reference or [inputs].reference)")?;
        Ok((detections, reference))
    }
}

async fn load_inputs(detections: &Path, reference: &Path) -> anyhow::Result<(Vec<DetectionRecord>, ReferenceMatrix)> {
    let (records, matrix) = tokio::try_join!(load_detections(detections), load_reference(reference))?;
    Ok((records, matrix))
}

fn log_ranking(report: &RiskReport, top: usize) {
    let ranked = report.pivot.ranked_totals();
    if ranked.is_empty() {
        tracing::warn!("No detection matched the MCDA matrix; result tables are empty.");
        return;
    }
    info!("Top {} samples by total risk score:", top.min(ranked.len()));
    for (rank, (sample, total)) in ranked.iter().take(top).enumerate() {
        info!("  {:>3}. {:<30} {:.3}", rank + 1, sample, total);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("Resistome v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Validate { inputs } => {
            let (detections, reference) = inputs.resolve(&config)?;
            let (records, matrix) = load_inputs(detections, reference).await?;
            info!(
                "✅ Inputs valid: {} detections, {} reference rows, criteria: {}",
                records.len(),
                matrix.rows.len(),
                matrix.criteria.names().join(", ")
            );
        }
        Commands::Score { inputs, out, log_pivot, facets, top } => {
            let (detections, reference) = inputs.resolve(&config)?;
            let (records, matrix) = load_inputs(detections, reference).await?;

            let report = run_pipeline(&records, &matrix);
            log_ranking(&report, *top);

            let mut files = config.output_files(out.as_deref())?;
            let out_dir = out.clone().unwrap_or_else(|| config.output.dir.clone());
            if *log_pivot && files.log_pivot.is_none() {
                files.log_pivot = Some(out_dir.join(&config.output.log_pivot_file));
            }
            if let Some(metric) = facets {
                files.facets = Some((out_dir.join(&config.output.facets_dir), *metric));
            }

            let written = write_report(&report, &files)?;
            if config.output.write_summary {
                std::fs::create_dir_all(&out_dir)?;
                let summary_path = out_dir.join("run_summary.json");
                let summary = serde_json::json!({
                    "detections": detections,
                    "reference": reference,
                    "criteria": report.criteria.names(),
                    "match_stats": report.stats,
                    "samples": report.pivot.rows.len(),
                    "drug_classes": report.pivot.drug_classes,
                    "outputs": written,
                });
                std::fs::write(&summary_path, serde_json::to_vec_pretty(&summary)?)
                    .with_context(|| format!("Failed to write {}", summary_path.display()))?;
            }

            for path in &written {
                info!("📄 {}", path.display());
            }
        }
    }

    Ok(())
}
