// epiwatch-core/src/ports/sink.rs

use std::path::PathBuf;

use crate::domain::table::{CanonicalRecord, GrowthMetric, IncidenceMetric};
use crate::error::EpiwatchError;
use async_trait::async_trait;

/// Final destination of a run: one artifact, one logical table per input.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write(
        &self,
        canonical: &[CanonicalRecord],
        incidence: &[IncidenceMetric],
        growth: &[GrowthMetric],
    ) -> Result<PathBuf, EpiwatchError>;
}
