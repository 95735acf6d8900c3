// epiwatch-core/src/domain/transform/normalizer.rs

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::table::{CanonicalRecord, RawTable};

/// Fixed reference country every comparison is made against.
pub const REFERENCE_COUNTRY: &str = "Ecuador";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "location",
    "date",
    "new_cases",
    "people_vaccinated",
    "population",
];

/// Fails with `MissingColumns` naming every absent column.
pub fn require_columns(table: &RawTable, required: &[&str]) -> Result<(), DomainError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !table.has_column(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::missing_columns(missing))
    }
}

/// Canonical working dataset plus the run metadata of the normalization stage.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedDataset {
    pub records: Vec<CanonicalRecord>,
    pub comparison_country: String,
}

impl NormalizedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TableNormalizer {
    comparison_country: String,
}

impl TableNormalizer {
    pub fn new(comparison_country: impl Into<String>) -> Self {
        Self {
            comparison_country: comparison_country.into(),
        }
    }

    pub fn countries(&self) -> [&str; 2] {
        [REFERENCE_COUNTRY, self.comparison_country.as_str()]
    }

    /// Project -> parse -> drop nulls -> dedup (first wins) -> filter countries.
    ///
    /// Rows without a location or a parseable date are dropped as well: they
    /// can be neither keyed nor placed in a time window.
    #[instrument(skip(self, table), fields(rows = table.len(), comparison = %self.comparison_country))]
    pub fn normalize(&self, table: &RawTable) -> Result<NormalizedDataset, DomainError> {
        require_columns(table, &REQUIRED_COLUMNS)?;

        let idx = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| DomainError::missing_columns([name]))
        };
        let (loc_i, date_i, cases_i, vacc_i, pop_i) = (
            idx("location")?,
            idx("date")?,
            idx("new_cases")?,
            idx("people_vaccinated")?,
            idx("population")?,
        );

        let countries = self.countries();
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for row in table.rows() {
            let (Some(new_cases), Some(people_vaccinated)) =
                (row[cases_i].as_number(), row[vacc_i].as_number())
            else {
                continue;
            };
            let (Some(location), Some(date)) = (row[loc_i].as_text(), row[date_i].as_date())
            else {
                continue;
            };
            if !seen.insert((location.to_string(), date)) {
                continue;
            }
            if !countries.contains(&location) {
                continue;
            }
            records.push(CanonicalRecord {
                location: location.to_string(),
                date,
                new_cases,
                people_vaccinated,
                population: row[pop_i].as_number(),
            });
        }

        info!(
            rows = records.len(),
            comparison = %self.comparison_country,
            "Canonical dataset ready"
        );

        Ok(NormalizedDataset {
            records,
            comparison_country: self.comparison_country.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: [&str; 6] = [
        "location",
        "date",
        "new_cases",
        "people_vaccinated",
        "population",
        "iso_code",
    ];

    #[test]
    fn test_missing_columns_named_exactly() {
        let table = RawTable::from_text_rows(&["location", "date", "population"], &[]);
        let err = TableNormalizer::new("Peru").normalize(&table).unwrap_err();
        match err {
            DomainError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["new_cases", "people_vaccinated"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_required_column_reported_when_table_is_bare() {
        let table = RawTable::from_text_rows(&["iso_code"], &[vec!["ECU"]]);
        let err = TableNormalizer::new("Peru").normalize(&table).unwrap_err();
        match err {
            DomainError::MissingColumns { missing } => {
                let mut expected: Vec<&str> = REQUIRED_COLUMNS.to_vec();
                expected.sort();
                assert_eq!(missing, expected);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_filters_dedups_and_drops_nulls() {
        let table = RawTable::from_text_rows(
            &HEADER,
            &[
                vec!["Ecuador", "2021-01-01", "10", "100", "1000", "ECU"],
                // duplicate: first occurrence wins
                vec!["Ecuador", "2021-01-01", "99", "100", "1000", "ECU"],
                // null people_vaccinated: dropped
                vec!["Ecuador", "2021-01-02", "11", "", "1000", "ECU"],
                // null population: tolerated
                vec!["Peru", "2021-01-01", "5", "50", "", "PER"],
                // other country: filtered
                vec!["Chile", "2021-01-01", "7", "70", "2000", "CHL"],
                // unparseable date: dropped
                vec!["Peru", "someday", "5", "50", "3000", "PER"],
            ],
        );

        let out = TableNormalizer::new("Peru").normalize(&table).unwrap();
        assert_eq!(out.comparison_country, "Peru");
        assert_eq!(out.len(), 2);

        let ecuador = &out.records[0];
        assert_eq!(ecuador.location, "Ecuador");
        assert_eq!(ecuador.date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(ecuador.new_cases, 10.0);
        assert_eq!(ecuador.population, Some(1000.0));

        let peru = &out.records[1];
        assert_eq!(peru.location, "Peru");
        assert_eq!(peru.population, None);
    }

    #[test]
    fn test_comparison_country_is_configurable() {
        let table = RawTable::from_text_rows(
            &HEADER,
            &[
                vec!["Peru", "2021-01-01", "5", "50", "10", "PER"],
                vec!["Colombia", "2021-01-01", "6", "60", "10", "COL"],
            ],
        );
        let out = TableNormalizer::new("Colombia").normalize(&table).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].location, "Colombia");
    }

    #[test]
    fn test_output_unique_per_location_and_date() {
        let mut rows = Vec::new();
        for _ in 0..3 {
            for day in ["2021-01-01", "2021-01-02"] {
                rows.push(vec!["Ecuador", day, "1", "1", "10", "ECU"]);
                rows.push(vec!["Peru", day, "1", "1", "10", "PER"]);
            }
        }
        let table = RawTable::from_text_rows(&HEADER, &rows);
        let out = TableNormalizer::new("Peru").normalize(&table).unwrap();

        let keys: HashSet<(String, NaiveDate)> = out
            .records
            .iter()
            .map(|r| (r.location.clone(), r.date))
            .collect();
        assert_eq!(keys.len(), out.len());
        assert_eq!(out.len(), 4);
    }
}
