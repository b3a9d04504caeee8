//! Confidence interval estimation for metric scores.
//!
//! Two-sided intervals around the sample mean using Student's t-distribution
//! with `n - 1` degrees of freedom, which is the right tool when the number
//! of evaluation runs is small and the population variance is unknown.

use crate::metrics::{compute_mean, standard_error};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;
use thiserror::Error;

/// Errors raised by the estimator
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IntervalError {
    #[error("At least 2 scores are required for a confidence interval, got {len}")]
    InsufficientSample { len: usize },

    #[error("Confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidenceLevel(f64),
}

/// Desired coverage probability, strictly inside (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// The conventional 95% level
    pub const NINETY_FIVE: Self = Self(0.95);

    /// Validate a raw confidence level
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::InvalidConfidenceLevel` unless `0 < level < 1`.
    /// NaN is rejected.
    pub fn new(level: f64) -> Result<Self, IntervalError> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(IntervalError::InvalidConfidenceLevel(level))
        }
    }

    /// Raw probability value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Cumulative probability at the upper interval boundary, `(1 + level) / 2`
    #[must_use]
    pub fn upper_tail_probability(self) -> f64 {
        (1.0 + self.0) / 2.0
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = IntervalError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl<'de> Deserialize<'de> for ConfidenceLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point estimate and two-sided confidence interval for a sample mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Sample mean
    pub mean: f64,
    /// Lower interval bound
    pub lower_bound: f64,
    /// Upper interval bound
    pub upper_bound: f64,
    /// Confidence level used
    pub confidence_level: f64,
}

impl ConfidenceResult {
    /// Half-width of the interval
    #[must_use]
    pub fn margin_of_error(&self) -> f64 {
        self.upper_bound - self.mean
    }

    /// Full width of the interval
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Check whether `value` lies inside the closed interval
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }
}

/// Two-sided critical value of Student's t for `degrees_of_freedom`
///
/// # Errors
///
/// Returns `IntervalError::InsufficientSample` when `degrees_of_freedom` is
/// zero and `IntervalError::InvalidConfidenceLevel` for levels outside (0, 1).
#[allow(clippy::cast_precision_loss)]
pub fn t_critical(degrees_of_freedom: usize, confidence_level: f64) -> Result<f64, IntervalError> {
    if degrees_of_freedom == 0 {
        return Err(IntervalError::InsufficientSample { len: 1 });
    }
    let level = ConfidenceLevel::new(confidence_level)?;
    Ok(quantile(degrees_of_freedom as f64, level))
}

fn quantile(degrees_of_freedom: f64, level: ConfidenceLevel) -> f64 {
    // Only fails for non-positive freedom, which callers rule out.
    StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_or(f64::NAN, |dist| dist.inverse_cdf(level.upper_tail_probability()))
}

/// Estimate the mean of `scores` with a t-distribution confidence interval
///
/// Scores are not checked for finiteness; NaN or infinite inputs propagate
/// into the result.
///
/// # Errors
///
/// Returns `IntervalError::InsufficientSample` for fewer than 2 scores and
/// `IntervalError::InvalidConfidenceLevel` when the level is outside (0, 1).
pub fn estimate(scores: &[f64], confidence_level: f64) -> Result<ConfidenceResult, IntervalError> {
    if scores.len() < 2 {
        return Err(IntervalError::InsufficientSample { len: scores.len() });
    }
    let level = ConfidenceLevel::new(confidence_level)?;
    Ok(estimate_unchecked(scores, level))
}

/// Same as [`estimate`] with an already validated level
///
/// # Errors
///
/// Returns `IntervalError::InsufficientSample` for fewer than 2 scores.
pub fn estimate_with_level(
    scores: &[f64],
    level: ConfidenceLevel,
) -> Result<ConfidenceResult, IntervalError> {
    if scores.len() < 2 {
        return Err(IntervalError::InsufficientSample { len: scores.len() });
    }
    Ok(estimate_unchecked(scores, level))
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn estimate_unchecked(scores: &[f64], level: ConfidenceLevel) -> ConfidenceResult {
    let n = scores.len();

    // Identical scores: the naive sum can round away from the value itself.
    let first = scores[0];
    if scores.iter().all(|&x| x == first) {
        tracing::debug!(n, mean = first, "Constant sample, zero-width interval");
        return ConfidenceResult {
            mean: first,
            lower_bound: first,
            upper_bound: first,
            confidence_level: level.value(),
        };
    }

    let mean = compute_mean(scores);
    let sem = standard_error(scores);

    // Zero spread: skip the quantile so 0 * t stays exactly 0.
    let margin_of_error = if sem == 0.0 {
        0.0
    } else {
        quantile((n - 1) as f64, level) * sem
    };

    tracing::debug!(
        n,
        mean,
        sem,
        margin_of_error,
        confidence = level.value(),
        "Estimated confidence interval"
    );

    ConfidenceResult {
        mean,
        lower_bound: mean - margin_of_error,
        upper_bound: mean + margin_of_error,
        confidence_level: level.value(),
    }
}
