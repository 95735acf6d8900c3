// epiwatch-core/src/domain/metrics/growth.rs

use tracing::debug;

use crate::domain::metrics::window::{WINDOW_SIZE, partition_by_location, shift, sum, trailing};
use crate::domain::table::{CanonicalRecord, GrowthMetric};

/// Week-over-week growth of `new_cases`, per location.
///
/// `weekly_cases` is the trailing 7-sample sum, `previous_weekly_cases` the
/// same sum lagged by 7 samples; a value therefore needs 14 samples.
/// A zero previous week produces a non-finite ratio, which is dropped.
pub fn compute(records: &[CanonicalRecord]) -> Vec<GrowthMetric> {
    let mut out = Vec::new();

    for series in partition_by_location(records) {
        let cases: Vec<Option<f64>> = series.records.iter().map(|r| Some(r.new_cases)).collect();

        let current = trailing(&cases, WINDOW_SIZE, sum);
        let previous = trailing(&shift(&cases, WINDOW_SIZE), WINDOW_SIZE, sum);

        for ((record, cur), prev) in series.records.iter().zip(current).zip(previous) {
            let (Some(weekly_cases), Some(previous_weekly_cases)) = (cur, prev) else {
                continue;
            };
            let growth_factor_7d = weekly_cases / previous_weekly_cases;
            if !growth_factor_7d.is_finite() {
                continue;
            }
            out.push(GrowthMetric {
                week_end_date: record.date,
                location: record.location.clone(),
                weekly_cases,
                previous_weekly_cases,
                growth_factor_7d,
            });
        }
    }

    debug!(rows = out.len(), "growth_factor_7d computed");
    out
}
