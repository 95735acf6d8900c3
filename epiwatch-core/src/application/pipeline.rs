// epiwatch-core/src/application/pipeline.rs

use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::EpiwatchError;

// Application Services
use crate::application::ports::TemplateEngine;
use crate::application::validation::check_schema;

// Domain
use crate::domain::error::DomainError;
use crate::domain::metrics::MetricEngine;
use crate::domain::project::{PipelineConfig, RangeGate};
use crate::domain::quality::{RangeReport, RangeValidator};
use crate::domain::transform::TableNormalizer;

// Infrastructure
use crate::infrastructure::fs::{ensure_dir, write_json};

// Ports
use crate::ports::{RawTableSource, ReportSink, SourceOrigin};

pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Run metadata, persisted to `<target>/run_results.json` whether or not the
/// run completes.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunResult {
    pub success: bool,
    pub comparison_country: String,
    pub source_origin: Option<SourceOrigin>,
    pub source_location: Option<String>,
    pub source_columns: Vec<String>,
    pub raw_rows: usize,
    pub schema_passed: Option<bool>,
    pub blocking_failures: Vec<String>,
    pub advisory_failures: Vec<String>,
    pub canonical_rows: usize,
    pub incidence_rows: usize,
    pub growth_rows: usize,
    pub range: Option<RangeReport>,
    pub report_path: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub elapsed_ms: u128,
}

/// fetch -> schema check -> normalize -> metrics -> range check -> sink.
///
/// The schema report never stops the run. Missing columns do, and so does a
/// failed range check under [`RangeGate::Halt`].
#[instrument(skip_all, fields(project = %config.name, comparison = %config.comparison_country))]
pub async fn run_pipeline<S, K, T>(
    source: &S,
    sink: &K,
    renderer: &T,
    project_dir: &Path,
    config: &PipelineConfig,
) -> Result<RunResult, EpiwatchError>
where
    S: RawTableSource + ?Sized,
    K: ReportSink + ?Sized,
    T: TemplateEngine + ?Sized,
{
    info!("🚀 Starting epiwatch pipeline");
    let start_time = Instant::now();

    let target_dir = project_dir.join(&config.target_path);
    ensure_dir(&target_dir)?;

    let mut result = RunResult {
        comparison_country: config.comparison_country.clone(),
        ..RunResult::default()
    };

    let outcome = execute(source, sink, renderer, project_dir, config, &mut result).await;

    result.elapsed_ms = start_time.elapsed().as_millis();
    match &outcome {
        Ok(()) => result.success = true,
        Err(e) => {
            result.success = false;
            result.errors.push(e.to_string());
        }
    }
    write_json(target_dir.join(RUN_RESULTS_FILE), &result)?;

    outcome.map(|()| {
        info!(elapsed_ms = result.elapsed_ms, "✅ Pipeline finished");
        result
    })
}

async fn execute<S, K, T>(
    source: &S,
    sink: &K,
    renderer: &T,
    project_dir: &Path,
    config: &PipelineConfig,
    result: &mut RunResult,
) -> Result<(), EpiwatchError>
where
    S: RawTableSource + ?Sized,
    K: ReportSink + ?Sized,
    T: TemplateEngine + ?Sized,
{
    // 1. FETCH
    let snapshot = source.fetch().await?;
    result.source_origin = Some(snapshot.origin);
    result.source_location = Some(snapshot.location.clone());
    result.source_columns = snapshot.columns.iter().take(20).cloned().collect();
    result.raw_rows = snapshot.table.len();
    info!(origin = %snapshot.origin, rows = result.raw_rows, "Source loaded");

    // 2. SCHEMA CHECK (rapport écrit avant toute transformation)
    let report = check_schema(&snapshot, renderer, project_dir, config)?;
    result.schema_passed = Some(report.passed);
    result.blocking_failures = report.blocking_failures().map(|r| r.name.clone()).collect();
    result.advisory_failures = report.advisory_failures().map(|r| r.name.clone()).collect();
    if !report.passed {
        let msg = format!(
            "schema validation failed: {}",
            result.blocking_failures.join(", ")
        );
        warn!("{msg}");
        result.warnings.push(msg);
    }

    // 3. NORMALIZE
    let dataset = TableNormalizer::new(&config.comparison_country).normalize(&snapshot.table)?;
    result.canonical_rows = dataset.len();

    // 4. METRICS
    let incidence = MetricEngine::incidence_7d(&dataset.records);
    let growth = MetricEngine::growth_factor_7d(&dataset.records);
    result.incidence_rows = incidence.len();
    result.growth_rows = growth.len();
    info!(incidence = incidence.len(), growth = growth.len(), "Metrics computed");

    // 5. RANGE CHECK
    let range = RangeValidator::validate(&incidence);
    result.range = Some(range.clone());
    if !range.passed {
        match config.quality.range_gate {
            RangeGate::Halt => {
                return Err(DomainError::RangeGateTripped {
                    out_of_range: range.out_of_range_count,
                    lower: range.lower,
                    upper: range.upper,
                }
                .into());
            }
            RangeGate::Flag => {
                let msg = format!(
                    "{} incidence values outside [{}, {}]",
                    range.out_of_range_count, range.lower, range.upper
                );
                warn!("⚠️  {msg}");
                result.warnings.push(msg);
            }
        }
    }

    // 6. SINK
    let path = sink.write(&dataset.records, &incidence, &growth).await?;
    info!(path = ?path, "Report written");
    result.report_path = Some(path.display().to_string());

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::table::{CanonicalRecord, GrowthMetric, IncidenceMetric, RawTable};
    use crate::infrastructure::render::MarkdownRenderer;
    use crate::ports::SourceSnapshot;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct FixtureSource(RawTable);

    #[async_trait]
    impl RawTableSource for FixtureSource {
        async fn fetch(&self) -> Result<SourceSnapshot, EpiwatchError> {
            Ok(SourceSnapshot {
                table: self.0.clone(),
                columns: self.0.columns().to_vec(),
                origin: SourceOrigin::Local,
                location: "fixture.csv".into(),
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        written: Mutex<Option<(usize, usize, usize)>>,
    }

    #[async_trait]
    impl ReportSink for MemorySink {
        async fn write(
            &self,
            canonical: &[CanonicalRecord],
            incidence: &[IncidenceMetric],
            growth: &[GrowthMetric],
        ) -> Result<PathBuf, EpiwatchError> {
            *self.written.lock().unwrap() = Some((canonical.len(), incidence.len(), growth.len()));
            Ok(PathBuf::from("memory://report"))
        }
    }

    /// 14 days per country, constant cases.
    fn fixture(population: &str) -> RawTable {
        let mut rows = Vec::new();
        for country in ["Ecuador", "Peru", "Chile"] {
            for day in 1..=14 {
                rows.push(vec![
                    country.to_string(),
                    format!("2021-01-{day:02}"),
                    "10".to_string(),
                    "100".to_string(),
                    population.to_string(),
                ]);
            }
        }
        let rows: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        RawTable::from_text_rows(
            &["location", "date", "new_cases", "people_vaccinated", "population"],
            &rows,
        )
    }

    fn read_results(dir: &Path) -> serde_json::Value {
        let raw = std::fs::read_to_string(dir.join("target").join(RUN_RESULTS_FILE)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_full_run_writes_report_and_metadata() -> Result<()> {
        let dir = tempdir()?;
        let sink = MemorySink::default();
        let config = PipelineConfig::default();

        let result = run_pipeline(
            &FixtureSource(fixture("1000000")),
            &sink,
            &MarkdownRenderer::new(),
            dir.path(),
            &config,
        )
        .await?;

        assert!(result.success);
        assert_eq!(result.canonical_rows, 28);
        // 8 fenêtres complètes par pays, une seule paire de semaines
        assert_eq!(result.incidence_rows, 16);
        assert_eq!(result.growth_rows, 2);
        assert_eq!(*sink.written.lock().unwrap(), Some((28, 16, 2)));
        assert!(dir.path().join("target/validation_report.md").exists());
        assert_eq!(read_results(dir.path())["source_origin"], "local");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_columns_abort_after_validation_artifacts() -> Result<()> {
        let dir = tempdir()?;
        let sink = MemorySink::default();
        let table = RawTable::from_text_rows(&["location", "date"], &[vec!["Ecuador", "2021-01-01"]]);

        let result = run_pipeline(
            &FixtureSource(table),
            &sink,
            &MarkdownRenderer::new(),
            dir.path(),
            &PipelineConfig::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(EpiwatchError::Domain(DomainError::MissingColumns { .. }))
        ));
        assert!(sink.written.lock().unwrap().is_none());
        assert!(dir.path().join("target/validation_report.json").exists());
        assert_eq!(read_results(dir.path())["success"], false);
        Ok(())
    }

    #[tokio::test]
    async fn test_range_gate_halt_skips_sink() -> Result<()> {
        let dir = tempdir()?;
        let sink = MemorySink::default();

        let result = run_pipeline(
            &FixtureSource(fixture("100")),
            &sink,
            &MarkdownRenderer::new(),
            dir.path(),
            &PipelineConfig::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(EpiwatchError::Domain(DomainError::RangeGateTripped { out_of_range: 16, .. }))
        ));
        assert!(sink.written.lock().unwrap().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_range_gate_flag_still_writes() -> Result<()> {
        let dir = tempdir()?;
        let sink = MemorySink::default();
        let mut config = PipelineConfig::default();
        config.quality.range_gate = RangeGate::Flag;

        let result = run_pipeline(
            &FixtureSource(fixture("100")),
            &sink,
            &MarkdownRenderer::new(),
            dir.path(),
            &config,
        )
        .await?;

        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.range.as_ref().map(|r| r.passed), Some(false));
        assert!(sink.written.lock().unwrap().is_some());
        Ok(())
    }
}
