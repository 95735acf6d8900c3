// epiwatch-core/src/ports/source.rs

// What the pipeline needs from upstream: a table of per-country daily
// observations, column names already case-normalized. Where it comes from
// (HTTP, local file, fixture) is the adapter's business.

use crate::domain::table::RawTable;
use crate::error::EpiwatchError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Remote,
    Local,
}

impl std::fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceOrigin::Remote => write!(f, "remote"),
            SourceOrigin::Local => write!(f, "local"),
        }
    }
}

/// The fetched table plus where it actually came from.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub table: RawTable,
    /// Every (normalized) header of the source, even when `table` only
    /// carries a projection of it.
    pub columns: Vec<String>,
    pub origin: SourceOrigin,
    pub location: String,
}

#[async_trait]
pub trait RawTableSource: Send + Sync {
    async fn fetch(&self) -> Result<SourceSnapshot, EpiwatchError>;
}
