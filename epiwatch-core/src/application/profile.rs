// epiwatch-core/src/application/profile.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::profile::DataProfile;
use crate::domain::project::PipelineConfig;
use crate::domain::transform::REFERENCE_COUNTRY;
use crate::error::EpiwatchError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, ensure_dir};
use crate::ports::RawTableSource;

pub const PROFILE_FILE: &str = "profile.csv";

/// Profiles the raw rows of the two compared countries into `<target>/profile.csv`.
#[instrument(skip_all, fields(comparison = %config.comparison_country))]
pub async fn run_profile<S>(
    source: &S,
    project_dir: &Path,
    config: &PipelineConfig,
) -> Result<(DataProfile, PathBuf), EpiwatchError>
where
    S: RawTableSource + ?Sized,
{
    let snapshot = source.fetch().await?;
    let profile = DataProfile::build(
        &snapshot.table,
        [REFERENCE_COUNTRY, config.comparison_country.as_str()],
    )?;

    let target_dir = project_dir.join(&config.target_path);
    ensure_dir(&target_dir)?;
    let path = target_dir.join(PROFILE_FILE);
    atomic_write(&path, to_csv(&profile)?)?;

    info!(rows = profile.rows, path = ?path, "Profile written");
    Ok((profile, path))
}

fn to_csv(profile: &DataProfile) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["metric", "value"])?;
    for (metric, value) in profile.entries() {
        writer.write_record([metric, value.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::table::RawTable;
    use crate::ports::{SourceOrigin, SourceSnapshot};
    use anyhow::Result;
    use async_trait::async_trait;
    use tempfile::tempdir;

    struct FixtureSource(RawTable);

    #[async_trait]
    impl RawTableSource for FixtureSource {
        async fn fetch(&self) -> Result<SourceSnapshot, EpiwatchError> {
            Ok(SourceSnapshot {
                table: self.0.clone(),
                columns: self.0.columns().to_vec(),
                origin: SourceOrigin::Local,
                location: "fixture".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_profile_csv_written() -> Result<()> {
        let dir = tempdir()?;
        let source = FixtureSource(RawTable::from_text_rows(
            &["location", "date", "new_cases", "people_vaccinated"],
            &[
                vec!["Ecuador", "2021-01-01", "10", ""],
                vec!["Peru", "2021-01-03", "", "5"],
                vec!["Chile", "2021-01-02", "999", "1"],
            ],
        ));

        let (profile, path) = run_profile(&source, dir.path(), &PipelineConfig::default()).await?;
        assert_eq!(profile.rows, 2);

        let content = std::fs::read_to_string(path)?;
        assert!(content.starts_with("metric,value\n"));
        assert!(content.contains("max_new_cases,10\n"));
        assert!(content.contains("pct_null_new_cases,50.00%\n"));
        assert!(content.contains("date_max,2021-01-03\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_requires_columns() -> Result<()> {
        let dir = tempdir()?;
        let source = FixtureSource(RawTable::from_text_rows(&["location", "date"], &[]));

        let result = run_profile(&source, dir.path(), &PipelineConfig::default()).await;
        assert!(matches!(
            result,
            Err(EpiwatchError::Domain(DomainError::MissingColumns { .. }))
        ));
        Ok(())
    }
}
