// epiwatch-core/src/domain/quality/range.rs

use serde::{Deserialize, Serialize};

use crate::domain::quality::report::{Severity, ValidationRule};
use crate::domain::table::IncidenceMetric;

pub const INCIDENCE_LOWER_BOUND: f64 = 0.0;
pub const INCIDENCE_UPPER_BOUND: f64 = 2000.0;

/// Outcome of the output range check on `incidence_7d`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RangeReport {
    pub passed: bool,
    pub out_of_range_count: usize,
    pub checked: usize,
    pub lower: f64,
    pub upper: f64,
}

impl RangeReport {
    pub fn as_rule(&self) -> ValidationRule {
        ValidationRule {
            name: format!("incidence_7d in [{}, {}]", self.lower, self.upper),
            passed: self.passed,
            affected_row_count: self.out_of_range_count,
            notes: format!("checked={}", self.checked),
            severity: Severity::Blocking,
        }
    }
}

pub struct RangeValidator;

impl RangeValidator {
    /// Closed interval `[0, 2000]`. Non-finite values are out of range.
    pub fn validate(metrics: &[IncidenceMetric]) -> RangeReport {
        let bounds = INCIDENCE_LOWER_BOUND..=INCIDENCE_UPPER_BOUND;
        let out_of_range_count = metrics
            .iter()
            .filter(|m| !bounds.contains(&m.incidence_7d))
            .count();

        RangeReport {
            passed: out_of_range_count == 0,
            out_of_range_count,
            checked: metrics.len(),
            lower: INCIDENCE_LOWER_BOUND,
            upper: INCIDENCE_UPPER_BOUND,
        }
    }
}
