// epiwatch-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::domain::quality::DEFAULT_NULL_POPULATION_MAX_PCT;

pub const OWID_URL_DEFAULT: &str =
    "https://catalog.ourworldindata.org/garden/covid/latest/compact/compact.csv";

/// What the orchestrator does when the incidence range check fails.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RangeGate {
    /// Abort the run before the report is written.
    #[default]
    Halt,
    /// Record the failure and keep going.
    Flag,
}

impl FromStr for RangeGate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "halt" => Ok(Self::Halt),
            "flag" => Ok(Self::Flag),
            other => Err(format!("unknown range gate '{other}' (expected halt|flag)")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SourceConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_source_url")]
    pub url: String,

    #[validate(length(min = 1))]
    #[serde(rename = "local-fallback", default = "default_local_fallback")]
    pub local_fallback: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            local_fallback: default_local_fallback(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct QualityConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(
        rename = "null-population-max-pct",
        default = "default_null_population_max_pct"
    )]
    pub null_population_max_pct: f64,

    #[serde(rename = "range-gate", default)]
    pub range_gate: RangeGate,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            null_population_max_pct: default_null_population_max_pct(),
            range_gate: RangeGate::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct PipelineConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[validate(nested)]
    #[serde(default)]
    pub source: SourceConfig,

    #[validate(nested)]
    #[serde(default)]
    pub quality: QualityConfig,

    #[validate(length(min = 1))]
    #[serde(rename = "comparison-country", default = "default_comparison_country")]
    pub comparison_country: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[validate(length(min = 1))]
    #[serde(rename = "report-file", default = "default_report_file")]
    pub report_file: String,

    /// Extra paths removed by `clean`, on top of `target_path`.
    #[serde(rename = "clean-targets", default)]
    pub clean_targets: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            source: SourceConfig::default(),
            quality: QualityConfig::default(),
            comparison_country: default_comparison_country(),
            target_path: default_target_path(),
            report_file: default_report_file(),
            clean_targets: Vec::new(),
        }
    }
}

fn default_name() -> String {
    "covid_pipeline".to_string()
}
fn default_source_url() -> String {
    OWID_URL_DEFAULT.to_string()
}
fn default_local_fallback() -> String {
    "data/compact.csv".to_string()
}
fn default_null_population_max_pct() -> f64 {
    DEFAULT_NULL_POPULATION_MAX_PCT
}
fn default_comparison_country() -> String {
    "Peru".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_report_file() -> String {
    "covid_report.duckdb".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.comparison_country, "Peru");
        assert_eq!(config.quality.null_population_max_pct, 0.05);
        assert_eq!(config.quality.range_gate, RangeGate::Halt);
        assert_eq!(config.source.local_fallback, "data/compact.csv");
        assert!(config.clean_targets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "comparison-country: Colombia\nquality:\n  range-gate: flag\n";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.comparison_country, "Colombia");
        assert_eq!(config.quality.range_gate, RangeGate::Flag);
        assert_eq!(config.quality.null_population_max_pct, 0.05);
        assert_eq!(config.source.url, OWID_URL_DEFAULT);
    }

    #[test]
    fn test_out_of_range_threshold_is_invalid() {
        let mut config = PipelineConfig::default();
        config.quality.null_population_max_pct = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_range_gate_from_str() {
        assert_eq!("FLAG".parse::<RangeGate>(), Ok(RangeGate::Flag));
        assert_eq!(" halt ".parse::<RangeGate>(), Ok(RangeGate::Halt));
        assert!("stop".parse::<RangeGate>().is_err());
    }
}
