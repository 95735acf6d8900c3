// epiwatch-core/src/domain/profile.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::table::{Cell, RawTable};
use crate::domain::transform::require_columns;

pub const PROFILE_REQUIRED_COLUMNS: [&str; 4] =
    ["location", "date", "new_cases", "people_vaccinated"];

/// Inferred storage kind of a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Empty,
    Numeric,
    Date,
    Text,
}

impl ColumnKind {
    pub fn infer<'a>(cells: impl Iterator<Item = &'a Cell>) -> Self {
        let values: Vec<&Cell> = cells.filter(|c| !c.is_null()).collect();
        if values.is_empty() {
            ColumnKind::Empty
        } else if values.iter().all(|c| c.as_number().is_some()) {
            ColumnKind::Numeric
        } else if values.iter().all(|c| c.as_date().is_some()) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Empty => "empty",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        }
    }
}

/// Exploratory summary of the raw rows of the two compared countries.
#[derive(Debug, Clone, Serialize)]
pub struct DataProfile {
    pub rows: usize,
    pub columns: Vec<String>,
    pub kinds: Vec<(String, ColumnKind)>,
    pub min_new_cases: Option<f64>,
    pub max_new_cases: Option<f64>,
    pub pct_null_new_cases: f64,
    pub pct_null_people_vaccinated: f64,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

impl DataProfile {
    pub fn build(table: &RawTable, countries: [&str; 2]) -> Result<Self, DomainError> {
        require_columns(table, &PROFILE_REQUIRED_COLUMNS)?;

        let loc_idx = table
            .column_index("location")
            .ok_or_else(|| DomainError::missing_columns(["location"]))?;
        let subset = table.filter_rows(|row| {
            row[loc_idx]
                .as_text()
                .is_some_and(|l| countries.contains(&l))
        });

        let kinds = subset
            .columns()
            .iter()
            .map(|name| {
                let kind = subset
                    .column(name)
                    .map(ColumnKind::infer)
                    .unwrap_or(ColumnKind::Empty);
                (name.clone(), kind)
            })
            .collect();

        let cases: Vec<f64> = numbers(&subset, "new_cases");
        let dates: Vec<NaiveDate> = subset
            .column("date")
            .map(|cells| cells.filter_map(Cell::as_date).collect())
            .unwrap_or_default();

        Ok(Self {
            rows: subset.len(),
            columns: subset.columns().to_vec(),
            kinds,
            min_new_cases: cases.iter().copied().reduce(f64::min),
            max_new_cases: cases.iter().copied().reduce(f64::max),
            pct_null_new_cases: null_pct(&subset, "new_cases"),
            pct_null_people_vaccinated: null_pct(&subset, "people_vaccinated"),
            date_min: dates.iter().min().copied(),
            date_max: dates.iter().max().copied(),
        })
    }

    /// `(metric, value)` pairs in export order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let opt = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        let opt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        vec![
            ("columns", self.columns.join(";")),
            (
                "kinds",
                self.kinds
                    .iter()
                    .map(|(name, kind)| format!("{}:{}", name, kind.label()))
                    .collect::<Vec<_>>()
                    .join(";"),
            ),
            ("min_new_cases", opt(self.min_new_cases)),
            ("max_new_cases", opt(self.max_new_cases)),
            ("pct_null_new_cases", format!("{:.2}%", self.pct_null_new_cases)),
            (
                "pct_null_people_vaccinated",
                format!("{:.2}%", self.pct_null_people_vaccinated),
            ),
            ("date_min", opt_date(self.date_min)),
            ("date_max", opt_date(self.date_max)),
        ]
    }
}

fn numbers(table: &RawTable, column: &str) -> Vec<f64> {
    table
        .column(column)
        .map(|cells| cells.filter_map(Cell::as_number).collect())
        .unwrap_or_default()
}

fn null_pct(table: &RawTable, column: &str) -> f64 {
    let nulls = table
        .column(column)
        .map(|cells| cells.filter(|c| c.is_null()).count())
        .unwrap_or(0);
    nulls as f64 / table.len().max(1) as f64 * 100.0
}
