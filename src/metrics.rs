//! Metric score collection and sample statistics.
//!
//! Scores arrive per evaluation run (or fold) from the external evaluation
//! loop; the collector groups them by metric name so each group can be fed
//! to the interval estimator.

use crate::interval::{estimate, ConfidenceResult, IntervalError};
use serde::{Deserialize, Serialize};

/// Compute mean of samples
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Compute sample standard deviation (Bessel-corrected, divisor `n - 1`)
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_std(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mean = compute_mean(samples);
    let variance =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    variance.sqrt()
}

/// Standard error of the mean: sample standard deviation over `sqrt(n)`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn standard_error(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    compute_std(samples) / (samples.len() as f64).sqrt()
}

/// All observations recorded for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    /// Metric name as it appears in the evaluation output (e.g. `macro_f1`)
    pub name: String,
    /// One score per run or fold
    pub scores: Vec<f64>,
}

impl MetricScores {
    /// Number of recorded observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Sample mean of the recorded scores
    #[must_use]
    pub fn mean(&self) -> f64 {
        compute_mean(&self.scores)
    }
}

/// Collector of per-run scores keyed by metric name
///
/// Metrics keep the order in which they were first recorded.
#[derive(Debug, Default, Clone)]
pub struct MetricsCollector {
    metrics: Vec<MetricScores>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single observation for `metric`
    pub fn record(&mut self, metric: &str, value: f64) {
        self.entry(metric).scores.push(value);
    }

    /// Record several observations for `metric`
    pub fn extend<I>(&mut self, metric: &str, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        self.entry(metric).scores.extend(values);
    }

    fn entry(&mut self, metric: &str) -> &mut MetricScores {
        let idx = match self.metrics.iter().position(|m| m.name == metric) {
            Some(idx) => idx,
            None => {
                self.metrics.push(MetricScores {
                    name: metric.to_string(),
                    scores: Vec::new(),
                });
                self.metrics.len() - 1
            }
        };
        &mut self.metrics[idx]
    }

    /// Scores recorded for `metric`, if any
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&[f64]> {
        self.metrics
            .iter()
            .find(|m| m.name == metric)
            .map(|m| m.scores.as_slice())
    }

    /// Check whether `metric` has been recorded
    #[must_use]
    pub fn contains(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m.name == metric)
    }

    /// Metric names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name.as_str())
    }

    /// Iterate over all collected metrics
    pub fn iter(&self) -> impl Iterator<Item = &MetricScores> {
        self.metrics.iter()
    }

    /// Number of distinct metrics
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check if no metric has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Estimate a confidence interval for one metric
    ///
    /// A metric that was never recorded counts as an empty sample.
    ///
    /// # Errors
    ///
    /// Propagates `IntervalError` from the estimator.
    pub fn estimate(
        &self,
        metric: &str,
        confidence_level: f64,
    ) -> Result<ConfidenceResult, IntervalError> {
        estimate(self.get(metric).unwrap_or_default(), confidence_level)
    }
}
