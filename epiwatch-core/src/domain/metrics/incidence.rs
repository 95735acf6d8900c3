// epiwatch-core/src/domain/metrics/incidence.rs

use tracing::debug;

use crate::domain::metrics::window::{WINDOW_SIZE, mean, partition_by_location, trailing};
use crate::domain::table::{CanonicalRecord, IncidenceMetric};

/// Cases per 100k inhabitants.
pub const PER_POPULATION: f64 = 100_000.0;

/// 7-day trailing mean of the daily incidence, per location.
///
/// The first six samples of every location yield nothing. A window touching
/// a missing population is undefined and dropped. Infinite values (zero
/// population) are kept so the range check can flag them.
pub fn compute(records: &[CanonicalRecord]) -> Vec<IncidenceMetric> {
    let mut out = Vec::new();

    for series in partition_by_location(records) {
        let daily: Vec<Option<f64>> = series
            .records
            .iter()
            .map(|r| r.population.map(|pop| r.new_cases / pop * PER_POPULATION))
            .collect();

        let rolling = trailing(&daily, WINDOW_SIZE, mean);

        for (record, value) in series.records.iter().zip(rolling) {
            if let Some(incidence_7d) = value.filter(|v| !v.is_nan()) {
                out.push(IncidenceMetric {
                    date: record.date,
                    location: record.location.clone(),
                    incidence_7d,
                });
            }
        }
    }

    debug!(rows = out.len(), "incidence_7d computed");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(location: &str, cases: &[f64], population: Option<f64>) -> Vec<CanonicalRecord> {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        cases
            .iter()
            .enumerate()
            .map(|(i, c)| CanonicalRecord {
                location: location.into(),
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                new_cases: *c,
                people_vaccinated: 0.0,
                population,
            })
            .collect()
    }

    #[test]
    fn test_single_full_week() {
        let records = series(
            "Ecuador",
            &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0],
            Some(1_000_000.0),
        );
        let out = compute(&records);
        assert_eq!(out.len(), 1);
        assert!((out[0].incidence_7d - 4.0).abs() < 1e-9);
        assert_eq!(out[0].date, records[6].date);
        assert_eq!(out[0].location, "Ecuador");
    }

    #[test]
    fn test_first_six_dates_per_location_have_no_value() {
        let mut records = series("Ecuador", &[1.0; 9], Some(100.0));
        records.extend(series("Peru", &[2.0; 8], Some(100.0)));
        let out = compute(&records);

        let ecuador: Vec<_> = out.iter().filter(|m| m.location == "Ecuador").collect();
        let peru: Vec<_> = out.iter().filter(|m| m.location == "Peru").collect();
        assert_eq!(ecuador.len(), 3);
        assert_eq!(peru.len(), 2);
        assert_eq!(ecuador[0].date, records[6].date);
    }

    #[test]
    fn test_windows_do_not_cross_locations() {
        // 4 + 4 samples: never 7 for a single location
        let mut records = series("Ecuador", &[1.0; 4], Some(100.0));
        records.extend(series("Peru", &[1.0; 4], Some(100.0)));
        assert!(compute(&records).is_empty());
    }

    #[test]
    fn test_missing_population_voids_window() {
        let mut records = series("Ecuador", &[5.0; 8], Some(100.0));
        records[3].population = None;
        // windows ending at index 6 and 7 both contain index 3
        assert!(compute(&records).is_empty());
    }

    #[test]
    fn test_output_sorted_and_idempotent() {
        let mut records = series("Peru", &[3.0; 8], Some(10.0));
        records.extend(series("Ecuador", &[4.0; 8], Some(10.0)));
        records.reverse();

        let first = compute(&records);
        let second = compute(&records);
        assert_eq!(first, second);
        assert_eq!(first[0].location, "Ecuador");
        assert!(first.windows(2).all(|w| {
            (w[0].location.as_str(), w[0].date) <= (w[1].location.as_str(), w[1].date)
        }));
    }
}
