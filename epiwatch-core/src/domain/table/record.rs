// epiwatch-core/src/domain/table/record.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned observation. Unique per `(location, date)` within a dataset.
///
/// `population` stays optional: the normalizer tolerates missing population
/// (the schema check already reports it), and the growth metric does not need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub location: String,
    pub date: NaiveDate,
    pub new_cases: f64,
    pub people_vaccinated: f64,
    pub population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidenceMetric {
    pub date: NaiveDate,
    pub location: String,
    pub incidence_7d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetric {
    pub week_end_date: NaiveDate,
    pub location: String,
    pub weekly_cases: f64,
    pub previous_weekly_cases: f64,
    pub growth_factor_7d: f64,
}
