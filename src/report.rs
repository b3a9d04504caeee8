//! Report generation for metric confidence intervals.
//!
//! Renders each metric as the two-line summary
//!
//! ```text
//! Macro_f1 Mean: 0.800
//! 95.0% Confidence Interval: [0.780, 0.820]
//! ```
//!
//! and wraps the same data in markdown and JSON reports.

use crate::interval::{estimate_with_level, ConfidenceLevel, ConfidenceResult};
use crate::metrics::MetricsCollector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// Human-readable metric name: first character upper-cased, rest lower-cased
#[must_use]
pub fn display_name(metric: &str) -> String {
    let mut chars = metric.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Confidence level as a percentage, keeping `.0` on whole numbers (`95.0`)
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_percent(confidence_level: f64) -> String {
    let percent = confidence_level * 100.0;
    if percent.is_finite() && percent.fract() == 0.0 {
        format!("{percent:.1}")
    } else {
        format!("{percent}")
    }
}

/// Two-line summary of one interval
#[must_use]
pub fn format_interval(name: &str, result: &ConfidenceResult) -> String {
    format!(
        "{name} Mean: {:.3}\n{}% Confidence Interval: [{:.3}, {:.3}]",
        result.mean,
        format_percent(result.confidence_level),
        result.lower_bound,
        result.upper_bound
    )
}

/// Interval report for every requested metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// One entry per metric with an interval
    pub intervals: Vec<MetricInterval>,
    /// Metrics present in the results but without a valid interval
    pub skipped: Vec<SkippedMetric>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title
    pub title: String,
    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,
    /// Crate version
    pub framework_version: String,
    /// Confidence level used for every interval
    pub confidence: f64,
    /// Results files the scores came from
    pub sources: Vec<PathBuf>,
}

/// Confidence interval for one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInterval {
    /// Metric key, e.g. `macro_f1`
    pub metric: String,
    /// Display name, e.g. `Macro_f1`
    pub display_name: String,
    /// Number of scores
    pub sample_size: usize,
    /// Estimated interval
    pub result: ConfidenceResult,
}

/// Metric that could not be estimated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedMetric {
    /// Metric key
    pub metric: String,
    /// Why no interval was produced
    pub reason: String,
}

/// Builder for [`IntervalReport`]
pub struct ReportBuilder {
    title: String,
    level: ConfidenceLevel,
    sources: Vec<PathBuf>,
}

impl ReportBuilder {
    /// Create a new report builder
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            level: ConfidenceLevel::default(),
            sources: Vec::new(),
        }
    }

    /// Set the confidence level
    #[must_use]
    pub const fn with_confidence(mut self, level: ConfidenceLevel) -> Self {
        self.level = level;
        self
    }

    /// Record the results files that fed the report
    #[must_use]
    pub fn with_sources(mut self, sources: &[PathBuf]) -> Self {
        self.sources.extend_from_slice(sources);
        self
    }

    /// Build the report for `metrics`, in the given order
    ///
    /// Metrics absent from `collector` are left out; metrics whose interval
    /// cannot be estimated are listed under `skipped`.
    #[must_use]
    pub fn build<S: AsRef<str>>(self, collector: &MetricsCollector, metrics: &[S]) -> IntervalReport {
        let mut intervals = Vec::new();
        let mut skipped = Vec::new();

        for metric in metrics {
            let metric: &str = metric.as_ref();
            let Some(scores) = collector.get(metric) else {
                tracing::debug!(metric, "Metric not present in results");
                continue;
            };

            match estimate_with_level(scores, self.level) {
                Ok(result) => intervals.push(MetricInterval {
                    metric: metric.to_string(),
                    display_name: display_name(metric),
                    sample_size: scores.len(),
                    result,
                }),
                Err(e) => {
                    tracing::warn!(metric, error = %e, "Skipping metric");
                    skipped.push(SkippedMetric {
                        metric: metric.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            intervals = intervals.len(),
            skipped = skipped.len(),
            confidence = self.level.value(),
            "Built interval report"
        );

        IntervalReport {
            metadata: ReportMetadata {
                title: self.title,
                generated_at: Utc::now(),
                framework_version: env!("CARGO_PKG_VERSION").to_string(),
                confidence: self.level.value(),
                sources: self.sources,
            },
            intervals,
            skipped,
        }
    }
}

/// Table row for markdown output
#[derive(Tabled)]
struct IntervalTableRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "n")]
    n: usize,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Lower")]
    lower: String,
    #[tabled(rename = "Upper")]
    upper: String,
    #[tabled(rename = "± Margin")]
    margin: String,
}

impl IntervalReport {
    /// Render report as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render report as plain text, one two-line block per metric
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        for interval in &self.intervals {
            writeln!(
                output,
                "{}",
                format_interval(&interval.display_name, &interval.result)
            )
            .ok();
        }
        for skipped in &self.skipped {
            writeln!(
                output,
                "{}: skipped ({})",
                display_name(&skipped.metric),
                skipped.reason
            )
            .ok();
        }

        output
    }

    /// Render report as markdown
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        writeln!(output, "# {}", self.metadata.title).ok();
        writeln!(output).ok();
        writeln!(
            output,
            "**Generated:** {}",
            self.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .ok();
        writeln!(
            output,
            "**Framework Version:** {}",
            self.metadata.framework_version
        )
        .ok();
        writeln!(
            output,
            "**Confidence Level:** {}%",
            format_percent(self.metadata.confidence)
        )
        .ok();
        writeln!(output).ok();

        writeln!(output, "## Confidence Intervals").ok();
        writeln!(output).ok();

        if self.intervals.is_empty() {
            writeln!(output, "_No metric had enough scores._").ok();
        } else {
            let rows: Vec<IntervalTableRow> = self
                .intervals
                .iter()
                .map(|i| IntervalTableRow {
                    metric: i.display_name.clone(),
                    n: i.sample_size,
                    mean: format!("{:.3}", i.result.mean),
                    lower: format!("{:.3}", i.result.lower_bound),
                    upper: format!("{:.3}", i.result.upper_bound),
                    margin: format!("{:.3}", i.result.margin_of_error()),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(tabled::settings::Style::markdown());
            writeln!(output, "{table}").ok();
        }
        writeln!(output).ok();

        if !self.skipped.is_empty() {
            writeln!(output, "## Skipped Metrics").ok();
            writeln!(output).ok();
            for skipped in &self.skipped {
                writeln!(output, "- `{}`: {}", skipped.metric, skipped.reason).ok();
            }
            writeln!(output).ok();
        }

        if !self.metadata.sources.is_empty() {
            writeln!(output, "## Sources").ok();
            writeln!(output).ok();
            for source in &self.metadata.sources {
                writeln!(output, "- {}", source.display()).ok();
            }
        }

        output
    }
}
