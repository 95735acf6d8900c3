// epiwatch-core/src/infrastructure/adapters/source.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::table::normalize_column_names;
use crate::error::EpiwatchError;
use crate::infrastructure::adapters::duckdb::{CsvLoad, DuckDBEngine};
use crate::infrastructure::adapters::http::{DEFAULT_TIMEOUT, HttpFetcher};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{RawTableSource, SourceOrigin, SourceSnapshot};

/// Remote CSV first, local CSV on any remote failure.
pub struct FallbackCsvSource {
    url: String,
    fallback: PathBuf,
    projection: Option<Vec<String>>,
    http: HttpFetcher,
}

impl FallbackCsvSource {
    pub fn new(url: impl Into<String>, fallback: impl Into<PathBuf>) -> Result<Self, InfrastructureError> {
        Ok(Self {
            url: url.into(),
            fallback: fallback.into(),
            projection: None,
            http: HttpFetcher::new(DEFAULT_TIMEOUT)?,
        })
    }

    /// Only materialize these (normalized) columns. The snapshot still lists
    /// the full header.
    pub fn with_projection(mut self, columns: &[&str]) -> Self {
        self.projection = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    async fn fetch_remote(&self) -> Result<CsvLoad, InfrastructureError> {
        let file = self.http.download(&self.url).await?;
        self.load(file.path())
    }

    fn load(&self, path: &Path) -> Result<CsvLoad, InfrastructureError> {
        DuckDBEngine::in_memory()?.load_csv_columns(path, self.projection.as_deref())
    }
}

#[async_trait]
impl RawTableSource for FallbackCsvSource {
    async fn fetch(&self) -> Result<SourceSnapshot, EpiwatchError> {
        info!(url = %self.url, "Downloading source");

        let (load, origin, location) = match self.fetch_remote().await {
            Ok(load) => (load, SourceOrigin::Remote, self.url.clone()),
            Err(remote_err) => {
                warn!(
                    error = %remote_err,
                    fallback = %self.fallback.display(),
                    "Remote source failed, using local fallback"
                );
                let load = self.load(&self.fallback).map_err(|local_err| {
                    InfrastructureError::SourceUnavailable {
                        remote: remote_err.to_string(),
                        fallback: local_err.to_string(),
                    }
                })?;
                (
                    load,
                    SourceOrigin::Local,
                    self.fallback.display().to_string(),
                )
            }
        };

        let table = load.table.normalize_columns();
        let columns = normalize_column_names(&load.header);
        let preview: Vec<&str> = columns.iter().take(20).map(String::as_str).collect();
        info!(
            origin = %origin,
            rows = table.len(),
            columns = ?preview,
            loaded = table.columns().len(),
            "Source table loaded"
        );

        Ok(SourceSnapshot {
            table,
            columns,
            origin,
            location,
        })
    }
}
