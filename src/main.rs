//! Eval Interval CLI
//!
//! Confidence intervals for classifier evaluation metrics

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eval_interval::{
    estimate, format_interval, ConfidenceLevel, EvalConfig, OutputFormat, ReportBuilder,
    ResultsLoader,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eval-interval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a confidence interval from scores given on the command line
    Estimate {
        /// Comma-separated metric scores, one per run
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        scores: Vec<f64>,

        /// Confidence level in (0, 1)
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Metric name shown in the output
        #[arg(long, default_value = "Metric")]
        name: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an interval report from evaluation results files
    Report {
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Results file or glob pattern (overrides config)
        #[arg(long)]
        results: Option<String>,

        /// Confidence level (overrides config)
        #[arg(long)]
        confidence: Option<f64>,

        /// Metrics to report (overrides config)
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<String>,

        /// Output format: text, markdown or json (overrides config)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Report title (overrides config)
        #[arg(long)]
        title: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as YAML
    ShowConfig {
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Filter used when `RUST_LOG` is unset
const fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Estimate {
            scores,
            confidence,
            name,
            json,
        } => {
            tracing::info!(
                n = scores.len(),
                confidence,
                name = %name,
                "Estimating confidence interval"
            );

            let result = estimate(&scores, confidence)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format_interval(&name, &result));
            }
        }
        Commands::Report {
            config,
            results,
            confidence,
            metrics,
            format,
            title,
            output,
        } => {
            let mut settings = load_config(config.as_ref())?;
            if let Some(results) = results {
                settings.results = results;
            }
            if let Some(confidence) = confidence {
                settings.confidence = confidence;
            }
            if !metrics.is_empty() {
                settings.metrics = metrics;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(title) = title {
                settings.title = title;
            }
            settings.validate()?;

            tracing::info!(
                results = %settings.results,
                confidence = settings.confidence,
                metrics = ?settings.metrics,
                format = ?settings.format,
                "Generating report"
            );

            let loader = ResultsLoader::load(&settings.results)
                .with_context(|| format!("Failed to load results from {}", settings.results))?;
            let level = ConfidenceLevel::new(settings.confidence)?;

            let report = ReportBuilder::new(&settings.title)
                .with_confidence(level)
                .with_sources(loader.sources())
                .build(loader.collector(), &settings.metrics);

            if report.intervals.is_empty() && report.skipped.is_empty() {
                bail!(
                    "None of the requested metrics ({}) appear in the results",
                    settings.metrics.join(", ")
                );
            }

            let rendered = match settings.format {
                OutputFormat::Text => report.to_text(),
                OutputFormat::Markdown => report.to_markdown(),
                OutputFormat::Json => report.to_json()?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Report written");
                }
                None => print!("{rendered}"),
            }
        }
        Commands::ShowConfig { config } => {
            let settings = load_config(config.as_ref())?;
            print!("{}", settings.to_yaml()?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<EvalConfig> {
    match path {
        Some(path) => EvalConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EvalConfig::default()),
    }
}
