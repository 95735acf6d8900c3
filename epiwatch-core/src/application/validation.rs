// epiwatch-core/src/application/validation.rs

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::application::artifacts::write_validation_artifacts;
use crate::application::ports::TemplateEngine;
use crate::domain::project::PipelineConfig;
use crate::domain::quality::{SchemaValidator, ValidationReport};
use crate::error::EpiwatchError;
use crate::ports::{RawTableSource, SourceSnapshot};

/// Fetch + schema check only. The report is written but never gates.
#[instrument(skip_all, fields(project = %config.name))]
pub async fn run_validation<S, T>(
    source: &S,
    renderer: &T,
    project_dir: &Path,
    config: &PipelineConfig,
) -> Result<(SourceSnapshot, ValidationReport), EpiwatchError>
where
    S: RawTableSource + ?Sized,
    T: TemplateEngine + ?Sized,
{
    let snapshot = source.fetch().await?;
    let report = check_schema(&snapshot, renderer, project_dir, config)?;
    Ok((snapshot, report))
}

pub(crate) fn check_schema<T: TemplateEngine + ?Sized>(
    snapshot: &SourceSnapshot,
    renderer: &T,
    project_dir: &Path,
    config: &PipelineConfig,
) -> Result<ValidationReport, EpiwatchError> {
    let validator = SchemaValidator::new(config.quality.null_population_max_pct);
    let report = validator.evaluate(&snapshot.table);

    for rule in report.blocking_failures() {
        warn!(rule = %rule.name, affected = rule.affected_row_count, notes = %rule.notes, "Blocking rule failed");
    }
    for rule in report.advisory_failures() {
        info!(rule = %rule.name, affected = rule.affected_row_count, notes = %rule.notes, "Advisory rule failed");
    }

    let target_dir = project_dir.join(&config.target_path);
    write_validation_artifacts(renderer, &target_dir, &report)?;
    Ok(report)
}
