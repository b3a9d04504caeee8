//! # Eval Interval
//!
//! Confidence intervals for the evaluation metrics of a fine-tuned text
//! classifier (a classification head on a pretrained transformer encoder).
//!
//! The inference loop lives outside this crate. It writes per-run metric
//! scores (macro F1, macro precision, macro recall) as JSON; this crate
//! loads them and reports each metric's mean with a two-sided Student's t
//! confidence interval.
//!
//! ## Pipeline
//!
//! ```text
//! Results JSON (one file per run, or per-run arrays)
//!        ↓
//! ResultsLoader → MetricsCollector
//!        ↓
//! estimate(scores, confidence)   mean ± t(n-1) · s/√n
//!        ↓
//! IntervalReport (text | markdown | json)
//! ```
//!
//! ## Example
//!
//! ```
//! use eval_interval::{estimate, format_interval};
//!
//! let result = estimate(&[0.80, 0.82, 0.78, 0.81, 0.79], 0.95).unwrap();
//! assert!(result.lower_bound < result.mean && result.mean < result.upper_bound);
//! println!("{}", format_interval("Macro_f1", &result));
//! ```

pub mod config;
pub mod interval;
pub mod metrics;
pub mod report;
pub mod results;

pub use config::{ConfigError, EvalConfig, OutputFormat};
pub use interval::{
    estimate, estimate_with_level, t_critical, ConfidenceLevel, ConfidenceResult, IntervalError,
};
pub use metrics::{compute_mean, compute_std, standard_error, MetricScores, MetricsCollector};
pub use report::{
    display_name, format_interval, format_percent, IntervalReport, MetricInterval, ReportBuilder,
    ReportMetadata, SkippedMetric,
};
pub use results::{ResultsError, ResultsLoader};
