// epiwatch-core/src/domain/table/mod.rs

pub mod raw;
pub mod record;

pub use raw::{Cell, RawTable, normalize_column_names, parse_date};
pub use record::{CanonicalRecord, GrowthMetric, IncidenceMetric};
