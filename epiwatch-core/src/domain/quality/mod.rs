// epiwatch-core/src/domain/quality/mod.rs

pub mod range;
pub mod report;
pub mod schema;

pub use range::{INCIDENCE_LOWER_BOUND, INCIDENCE_UPPER_BOUND, RangeReport, RangeValidator};
pub use report::{RuleCollector, Severity, ValidationReport, ValidationRule};
pub use schema::{DEFAULT_NULL_POPULATION_MAX_PCT, SchemaValidator};
