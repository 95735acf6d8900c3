// epiwatch-core/src/application/artifacts.rs

use std::path::{Path, PathBuf};
use tracing::info;

use crate::application::ports::TemplateEngine;
use crate::domain::quality::ValidationReport;
use crate::error::EpiwatchError;
use crate::infrastructure::fs::{atomic_write, ensure_dir, write_json};

pub const VALIDATION_JSON: &str = "validation_report.json";
pub const VALIDATION_MARKDOWN: &str = "validation_report.md";

pub const VALIDATION_REPORT_TEMPLATE: &str = "## Validation report

|rule|severity|passed|affected_rows|notes|
|---|---|---|---:|---|
{% for r in rules %}|{{ r.name | cell }}|{{ r.severity }}|{{ r.passed | verdict }}|{{ r.affected_row_count }}|{{ r.notes | cell }}|
{% endfor %}
**overall:** {{ passed | verdict }}";

pub fn render_validation_report<T: TemplateEngine + ?Sized>(
    renderer: &T,
    report: &ValidationReport,
) -> Result<String, EpiwatchError> {
    let context = serde_json::to_value(report)
        .map_err(|e| EpiwatchError::InternalError(format!("validation report context: {e}")))?;
    renderer.render(VALIDATION_REPORT_TEMPLATE, &context)
}

/// Writes `validation_report.json` and `validation_report.md` under `target_dir`.
pub fn write_validation_artifacts<T: TemplateEngine + ?Sized>(
    renderer: &T,
    target_dir: &Path,
    report: &ValidationReport,
) -> Result<(PathBuf, PathBuf), EpiwatchError> {
    ensure_dir(target_dir)?;

    let json_path = target_dir.join(VALIDATION_JSON);
    write_json(&json_path, report)?;

    let md_path = target_dir.join(VALIDATION_MARKDOWN);
    let markdown = render_validation_report(renderer, report)?;
    atomic_write(&md_path, format!("{markdown}\n"))?;

    info!(path = ?md_path, passed = report.passed, "Validation artifacts written");
    Ok((json_path, md_path))
}
