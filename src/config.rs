//! Configuration module for interval reports.
//!
//! Handles YAML configuration loading with validation of the confidence
//! level and the metric list.

use crate::interval::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("No metrics configured")]
    NoMetrics,

    #[error("Invalid output format: {0}")]
    InvalidFormat(String),
}

/// Report output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text, two lines per metric
    #[default]
    Text,
    /// Markdown with a results table
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    /// Parse output format from string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFormat` if the string doesn't match a known format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Interval report configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalConfig {
    /// Confidence level for every interval
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Metrics to report, in output order
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    /// Results file or glob pattern (JSON)
    #[serde(default = "default_results")]
    pub results: String,
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
    /// Report title
    #[serde(default = "default_title")]
    pub title: String,
}

const fn default_confidence() -> f64 {
    0.95
}

fn default_metrics() -> Vec<String> {
    ["macro_f1", "macro_precision", "macro_recall"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_results() -> String {
    "runs/*.json".to_string()
}

fn default_title() -> String {
    "BERT classifier".to_string()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            metrics: default_metrics(),
            results: default_results(),
            format: OutputFormat::default(),
            title: default_title(),
        }
    }
}

impl EvalConfig {
    /// Load configuration from YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the confidence level and metric list
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfidence` or `ConfigError::NoMetrics`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.confidence_level()?;
        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }
        Ok(())
    }

    /// Validated confidence level
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfidence` if outside (0, 1).
    pub fn confidence_level(&self) -> Result<ConfidenceLevel, ConfigError> {
        ConfidenceLevel::new(self.confidence)
            .map_err(|_| ConfigError::InvalidConfidence(self.confidence))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_eval_config_default_values() {
        let config = EvalConfig::default();
        assert!((config.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(
            config.metrics,
            vec!["macro_f1", "macro_precision", "macro_recall"]
        );
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_eval_config_serialization_roundtrip() {
        let config = EvalConfig::default();
        let yaml = config.to_yaml().expect("serialize");
        let parsed = EvalConfig::from_yaml(&yaml).expect("deserialize");
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_eval_config_from_yaml() {
        let yaml = r#"
confidence: 0.99
metrics: [macro_f1]
results: "runs/seed-*.json"
format: markdown
title: "BERT CLS head"
"#;
        let config = EvalConfig::from_yaml(yaml).expect("parse yaml");
        assert!((config.confidence - 0.99).abs() < f64::EPSILON);
        assert_eq!(config.metrics, vec!["macro_f1"]);
        assert_eq!(config.results, "runs/seed-*.json");
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.title, "BERT CLS head");
    }

    #[test]
    fn test_eval_config_minimal() {
        let config = EvalConfig::from_yaml("format: json\n").expect("parse yaml");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.metrics.len(), 3); // default
        assert_eq!(config.results, "runs/*.json"); // default
        assert_eq!(config.title, "BERT classifier"); // default
    }

    #[test]
    fn test_eval_config_invalid_confidence() {
        let result = EvalConfig::from_yaml("confidence: 1.0\n");
        assert!(matches!(result, Err(ConfigError::InvalidConfidence(_))));

        let result = EvalConfig::from_yaml("confidence: 95\n");
        assert!(matches!(result, Err(ConfigError::InvalidConfidence(_))));
    }

    #[test]
    fn test_eval_config_empty_metrics() {
        let result = EvalConfig::from_yaml("metrics: []\n");
        assert!(matches!(result, Err(ConfigError::NoMetrics)));
    }

    #[test]
    fn test_eval_config_bad_yaml() {
        let result = EvalConfig::from_yaml("confidence: [not, a, number]\n");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_eval_config_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.yaml");
        std::fs::write(&path, "confidence: 0.9\n").unwrap();

        let config = EvalConfig::load(&path).unwrap();
        assert!((config.confidence_level().unwrap().value() - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eval_config_load_missing_file() {
        let result = EvalConfig::load("does-not-exist.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(
            OutputFormat::from_str("markdown").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert!(matches!(
            OutputFormat::from_str("html"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidConfidence(1.5);
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
    }
}
