// epiwatch-core/src/domain/metrics/window.rs

use crate::domain::table::CanonicalRecord;

/// Samples per trailing window (one week of daily observations).
pub const WINDOW_SIZE: usize = 7;

/// Date-ordered observations of a single location.
#[derive(Debug)]
pub struct LocationSeries<'a> {
    pub location: &'a str,
    pub records: Vec<&'a CanonicalRecord>,
}

/// Sorts by `(location, date)` and splits into one series per location.
/// Series come out in ascending location order.
pub fn partition_by_location(records: &[CanonicalRecord]) -> Vec<LocationSeries<'_>> {
    let mut sorted: Vec<&CanonicalRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.location.cmp(&b.location).then(a.date.cmp(&b.date)));

    let mut series: Vec<LocationSeries<'_>> = Vec::new();
    for record in sorted {
        match series.last_mut() {
            Some(current) if current.location == record.location => current.records.push(record),
            _ => series.push(LocationSeries {
                location: record.location.as_str(),
                records: vec![record],
            }),
        }
    }
    series
}

/// Trailing window reduce. Position `i` holds `reduce(values[i+1-size..=i])`
/// once `size` samples are available and none of them is missing.
pub fn trailing<F>(values: &[Option<f64>], size: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = Vec::with_capacity(values.len());
    let mut buf = Vec::with_capacity(size);
    for i in 0..values.len() {
        if size == 0 || i + 1 < size {
            out.push(None);
            continue;
        }
        buf.clear();
        buf.extend(values[i + 1 - size..=i].iter().flatten().copied());
        out.push((buf.len() == size).then(|| reduce(&buf)));
    }
    out
}

/// Lags a series by `periods` samples, padding the head with `None`.
pub fn shift(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let pad = periods.min(values.len());
    std::iter::repeat_n(None, pad)
        .chain(values[..values.len() - pad].iter().copied())
        .collect()
}

pub fn sum(window: &[f64]) -> f64 {
    window.iter().sum()
}

pub fn mean(window: &[f64]) -> f64 {
    sum(window) / window.len() as f64
}
