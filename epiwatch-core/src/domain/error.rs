// epiwatch-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Missing required columns: {missing:?}")]
    #[diagnostic(
        code(epiwatch::domain::missing_columns),
        help("The source table must expose these columns (after lower-casing and trimming).")
    )]
    MissingColumns { missing: Vec<String> },

    #[error(
        "Range gate tripped: {out_of_range} incidence_7d value(s) outside [{lower}, {upper}]"
    )]
    #[diagnostic(
        code(epiwatch::domain::range_gate),
        help("Set `quality.range-gate: flag` (or COVID_RANGE_GATE=flag) to report without halting.")
    )]
    RangeGateTripped {
        out_of_range: usize,
        lower: f64,
        upper: f64,
    },
}

impl DomainError {
    /// Builds a `MissingColumns` error with a stable (sorted, deduplicated) name list.
    pub fn missing_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut missing: Vec<String> = names.into_iter().map(Into::into).collect();
        missing.sort();
        missing.dedup();
        DomainError::MissingColumns { missing }
    }
}
