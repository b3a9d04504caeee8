//! Loading of evaluation output produced by the inference loop.
//!
//! Each results file is a JSON object keyed by metric name. A value may be
//! a single number (one run) or an array of numbers (several runs or
//! folds). `null` inside an array is a NaN run; any other non-numeric item
//! is an error. Entries that are neither numbers nor arrays, such as a
//! nested per-class report, are ignored.
//!
//! ```json
//! { "macro_f1": [0.80, 0.82, 0.78], "macro_precision": 0.81, "report": { ... } }
//! ```

use crate::metrics::MetricsCollector;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading results
#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Results file not found: {0}")]
    NotFound(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("No results files match: {0}")]
    NoMatches(String),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object of metrics in {0}")]
    NotAnObject(String),

    #[error("Non-numeric score {value} for metric `{metric}` in {path}")]
    NonNumericScore {
        path: String,
        metric: String,
        value: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Loader merging one or more results files into a [`MetricsCollector`]
#[derive(Debug, Default)]
pub struct ResultsLoader {
    sources: Vec<PathBuf>,
    collector: MetricsCollector,
}

impl ResultsLoader {
    /// Create an empty loader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single results file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a JSON object.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ResultsError> {
        let mut loader = Self::new();
        loader.add_file(path)?;
        Ok(loader)
    }

    /// Load every file matching a glob pattern, in sorted path order
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid, matches nothing, or any
    /// matched file fails to load.
    pub fn load_glob(pattern: &str) -> Result<Self, ResultsError> {
        let paths = glob::glob(pattern)
            .map_err(|e| ResultsError::InvalidPattern(format!("{pattern}: {e}")))?;

        let mut matched = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| {
                ResultsError::IoError(std::io::Error::other(format!("Glob error: {e}")))
            })?;
            if path.is_file() {
                matched.push(path);
            }
        }

        if matched.is_empty() {
            return Err(ResultsError::NoMatches(pattern.to_string()));
        }
        matched.sort();

        let mut loader = Self::new();
        for path in &matched {
            loader.add_file(path)?;
        }
        Ok(loader)
    }

    /// Load from a plain path if it exists, otherwise treat it as a glob
    ///
    /// # Errors
    ///
    /// See [`ResultsLoader::load_file`] and [`ResultsLoader::load_glob`].
    pub fn load(path_or_pattern: &str) -> Result<Self, ResultsError> {
        if Path::new(path_or_pattern).is_file() {
            Self::load_file(path_or_pattern)
        } else {
            Self::load_glob(path_or_pattern)
        }
    }

    /// Merge one more results file into the loader
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a JSON object.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ResultsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ResultsError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let recorded = self.add_json(&content).map_err(|e| match e {
            ResultsError::Parse { source, .. } => ResultsError::Parse {
                path: path.display().to_string(),
                source,
            },
            ResultsError::NotAnObject(_) => ResultsError::NotAnObject(path.display().to_string()),
            ResultsError::NonNumericScore { metric, value, .. } => ResultsError::NonNumericScore {
                path: path.display().to_string(),
                metric,
                value,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), recorded, "Loaded results file");
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Merge results from a JSON string, returning the number of scores recorded
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a JSON object or a metric array
    /// holds a non-numeric item. Nothing is recorded on error.
    pub fn add_json(&mut self, json: &str) -> Result<usize, ResultsError> {
        let value: Value = serde_json::from_str(json).map_err(|source| ResultsError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;

        let Value::Object(map) = value else {
            return Err(ResultsError::NotAnObject("<inline>".to_string()));
        };

        let mut parsed = Vec::with_capacity(map.len());
        for (metric, value) in &map {
            match numeric_scores(value) {
                Ok(Some(scores)) => parsed.push((metric, scores)),
                Ok(None) => {
                    tracing::debug!(metric = %metric, "Ignoring non-numeric results entry");
                }
                Err(item) => {
                    return Err(ResultsError::NonNumericScore {
                        path: "<inline>".to_string(),
                        metric: metric.clone(),
                        value: item.to_string(),
                    });
                }
            }
        }

        let mut recorded = 0;
        for (metric, scores) in parsed {
            if scores.iter().any(|x| x.is_nan()) {
                tracing::warn!(metric = %metric, "Results contain null (NaN) scores");
            }
            recorded += scores.len();
            self.collector.extend(metric, scores);
        }
        Ok(recorded)
    }

    /// Files merged so far, in load order
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Collected scores
    #[must_use]
    pub const fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    /// Consume the loader, returning the collected scores
    #[must_use]
    pub fn into_collector(self) -> MetricsCollector {
        self.collector
    }
}

/// Scores held by a metric entry
///
/// `None` for entries that are not metric scores; `Err` carries the first
/// array item that is neither a number nor `null`.
fn numeric_scores(value: &Value) -> Result<Option<Vec<f64>>, &Value> {
    match value {
        Value::Number(n) => Ok(Some(vec![n.as_f64().unwrap_or(f64::NAN)])),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
                Value::Null => Ok(f64::NAN),
                other => Err(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}
