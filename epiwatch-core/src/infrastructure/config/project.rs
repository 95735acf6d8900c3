// epiwatch-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::{PipelineConfig, RangeGate};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["epiwatch.yaml", "epiwatch.yml"];

pub const ENV_SOURCE_URL: &str = "COVID_SOURCE_URL";
pub const ENV_LOCAL_FALLBACK: &str = "COVID_LOCAL_FALLBACK";
pub const ENV_NULL_POP_MAX_PCT: &str = "COVID_NULL_POP_MAX_PCT";
pub const ENV_COUNTRY_COMPARE: &str = "COVID_COUNTRY_COMPARE";
pub const ENV_RANGE_GATE: &str = "COVID_RANGE_GATE";
pub const ENV_TARGET_PATH: &str = "EPIWATCH_TARGET_PATH";

/// Defaults <- `epiwatch.yaml` (optional) <- process environment.
#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    load_pipeline_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_pipeline_config`] with an injectable environment lookup.
pub fn load_pipeline_config_with<F>(
    project_dir: &Path,
    env: F,
) -> Result<PipelineConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    // 1. Fichier optionnel
    let mut config = match find_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading pipeline config");
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                PipelineConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        None => {
            info!(dir = ?project_dir, "No epiwatch.yaml found, using defaults");
            PipelineConfig::default()
        }
    };

    // 2. Override via Variables d'Environnement (Pattern 'Layering')
    apply_env_overrides(&mut config, &env)?;

    // 3. Validation
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides<F>(config: &mut PipelineConfig, env: &F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env(ENV_SOURCE_URL) {
        info!(old = %config.source.url, new = %val, "Overriding source url via ENV");
        config.source.url = val;
    }
    if let Some(val) = env(ENV_LOCAL_FALLBACK) {
        info!(old = %config.source.local_fallback, new = %val, "Overriding local fallback via ENV");
        config.source.local_fallback = val;
    }
    if let Some(val) = env(ENV_NULL_POP_MAX_PCT) {
        let pct = val.trim().parse::<f64>().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "{ENV_NULL_POP_MAX_PCT} must be a number, got '{val}'"
            ))
        })?;
        info!(old = config.quality.null_population_max_pct, new = pct, "Overriding population null tolerance via ENV");
        config.quality.null_population_max_pct = pct;
    }
    if let Some(val) = env(ENV_COUNTRY_COMPARE) {
        info!(old = %config.comparison_country, new = %val, "Overriding comparison country via ENV");
        config.comparison_country = val;
    }
    if let Some(val) = env(ENV_RANGE_GATE) {
        let gate: RangeGate = val
            .parse()
            .map_err(|e: String| InfrastructureError::ConfigError(format!("{ENV_RANGE_GATE}: {e}")))?;
        config.quality.range_gate = gate;
    }
    if let Some(val) = env(ENV_TARGET_PATH) {
        info!(old = %config.target_path, new = %val, "Overriding target path via ENV");
        config.target_path = val;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = load_pipeline_config_with(dir.path(), env_from(&[]))?;
        assert_eq!(config.comparison_country, "Peru");
        assert_eq!(config.quality.null_population_max_pct, 0.05);
        Ok(())
    }

    #[test]
    fn test_env_overrides_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("epiwatch.yaml"),
            "comparison-country: Chile\ntarget-path: build\n",
        )?;
        let config = load_pipeline_config_with(
            dir.path(),
            env_from(&[
                (ENV_COUNTRY_COMPARE, "Colombia"),
                (ENV_NULL_POP_MAX_PCT, "0.2"),
                (ENV_RANGE_GATE, "flag"),
            ]),
        )?;
        assert_eq!(config.comparison_country, "Colombia");
        assert_eq!(config.target_path, "build");
        assert_eq!(config.quality.null_population_max_pct, 0.2);
        assert_eq!(config.quality.range_gate, RangeGate::Flag);
        Ok(())
    }

    #[test]
    fn test_non_numeric_threshold_rejected() -> Result<()> {
        let dir = tempdir()?;
        let result =
            load_pipeline_config_with(dir.path(), env_from(&[(ENV_NULL_POP_MAX_PCT, "lots")]));
        assert!(matches!(result, Err(InfrastructureError::ConfigError(_))));
        Ok(())
    }

    #[test]
    fn test_threshold_out_of_bounds_rejected() -> Result<()> {
        let dir = tempdir()?;
        let result =
            load_pipeline_config_with(dir.path(), env_from(&[(ENV_NULL_POP_MAX_PCT, "5")]));
        assert!(matches!(result, Err(InfrastructureError::ConfigError(_))));
        Ok(())
    }

    #[test]
    fn test_empty_comparison_country_rejected() -> Result<()> {
        let dir = tempdir()?;
        let result = load_pipeline_config_with(dir.path(), env_from(&[(ENV_COUNTRY_COMPARE, "")]));
        assert!(matches!(result, Err(InfrastructureError::ConfigError(_))));
        Ok(())
    }

    #[test]
    fn test_broken_yaml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("epiwatch.yml"), "quality: [unterminated")?;
        let result = load_pipeline_config_with(dir.path(), env_from(&[]));
        assert!(matches!(result, Err(InfrastructureError::YamlError(_))));
        Ok(())
    }
}
