// epiwatch/src/commands/mod.rs

pub mod clean;
pub mod inspect;
pub mod profile;
pub mod run;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use epiwatch_core::domain::project::PipelineConfig;
use epiwatch_core::infrastructure::adapters::FallbackCsvSource;
use epiwatch_core::infrastructure::config::load_pipeline_config;

/// Config file + env overrides, with the CLI's error context.
pub fn load_config(project_dir: &Path) -> anyhow::Result<PipelineConfig> {
    let config = load_pipeline_config(project_dir).with_context(|| {
        format!(
            "Failed to load pipeline configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (comparison: {})", config.name, config.comparison_country);
    Ok(config)
}

/// Remote URL first, then the local fallback resolved against the project dir.
pub fn build_source(project_dir: &Path, config: &PipelineConfig) -> anyhow::Result<FallbackCsvSource> {
    let fallback = resolve(project_dir, &config.source.local_fallback);
    FallbackCsvSource::new(&config.source.url, fallback)
        .context("Failed to initialize the HTTP client")
}

pub fn report_path(project_dir: &Path, config: &PipelineConfig) -> PathBuf {
    project_dir.join(&config.target_path).join(&config.report_file)
}

fn resolve(project_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}
