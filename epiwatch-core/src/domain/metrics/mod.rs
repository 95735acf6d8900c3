// epiwatch-core/src/domain/metrics/mod.rs

pub mod growth;
pub mod incidence;
pub mod window;

use crate::domain::table::{CanonicalRecord, GrowthMetric, IncidenceMetric};

pub use window::{LocationSeries, WINDOW_SIZE, partition_by_location, shift, trailing};

/// Entry point for the derived metrics. Both computations are pure functions
/// of the canonical dataset and can run in any order.
pub struct MetricEngine;

impl MetricEngine {
    pub fn incidence_7d(records: &[CanonicalRecord]) -> Vec<IncidenceMetric> {
        incidence::compute(records)
    }

    pub fn growth_factor_7d(records: &[CanonicalRecord]) -> Vec<GrowthMetric> {
        growth::compute(records)
    }
}
