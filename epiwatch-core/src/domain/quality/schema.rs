// epiwatch-core/src/domain/quality/schema.rs

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use tracing::{debug, instrument};

use crate::domain::quality::report::{RuleCollector, ValidationReport};
use crate::domain::table::{Cell, RawTable};

pub const DEFAULT_NULL_POPULATION_MAX_PCT: f64 = 0.05;

/// Input checks run on the raw table before any transformation.
///
/// Blocking rules: key columns present and non-null, `(location, date)`
/// uniqueness, population null ratio and positivity.
/// Advisory rules: `new_cases >= 0` (upstream revisions publish negative
/// corrections) and `max(date) <= today`.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    null_population_max_pct: f64,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_POPULATION_MAX_PCT)
    }
}

impl SchemaValidator {
    pub fn new(null_population_max_pct: f64) -> Self {
        Self {
            null_population_max_pct,
        }
    }

    /// Evaluates against the current UTC date.
    pub fn evaluate(&self, table: &RawTable) -> ValidationReport {
        self.evaluate_at(table, Utc::now().date_naive())
    }

    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn evaluate_at(&self, table: &RawTable, today: NaiveDate) -> ValidationReport {
        let total = table.len();
        let mut rules = RuleCollector::new();

        // 1. Existence + non-null (strict)
        for col in ["location", "date"] {
            match table.column(col) {
                Some(cells) => {
                    let nulls = if col == "date" {
                        cells.filter(|c| c.as_date().is_none()).count()
                    } else {
                        cells.filter(|c| c.is_null()).count()
                    };
                    rules.blocking(format!("{col} not null"), nulls == 0, nulls, "");
                }
                None => {
                    rules.blocking(format!("{col} exists"), false, total, format!("{col} missing"));
                }
            }
        }

        // 2. Unicité (location, date)
        match (table.column_index("location"), table.column_index("date")) {
            (Some(loc_idx), Some(date_idx)) => {
                let mut seen = HashSet::with_capacity(total);
                let duplicates = table
                    .rows()
                    .iter()
                    .filter(|row| !seen.insert((cell_key(&row[loc_idx]), row[date_idx].as_date())))
                    .count();
                rules.blocking("unique (location, date)", duplicates == 0, duplicates, "");
            }
            _ => {
                rules.blocking("unique (location, date)", false, total, "columns missing");
            }
        }

        // 3-4. Population: small null share tolerated, strictly positive otherwise
        match table.column("population") {
            Some(cells) => {
                let cells: Vec<&Cell> = cells.collect();
                let nulls = cells.iter().filter(|c| c.is_null()).count();
                let pct = nulls as f64 / total.max(1) as f64;
                rules.blocking(
                    format!(
                        "population not null (<={}%)",
                        (self.null_population_max_pct * 100.0).round() as i64
                    ),
                    pct <= self.null_population_max_pct,
                    nulls,
                    format!("pct={:.2}%", pct * 100.0),
                );

                // Non-numeric text counts as a failure, not as a skip.
                let non_positive = cells
                    .iter()
                    .filter(|c| !c.is_null())
                    .filter(|c| c.as_number().is_none_or(|n| n <= 0.0))
                    .count();
                rules.blocking("population > 0", non_positive == 0, non_positive, "");
            }
            None => {
                rules.blocking("population exists", false, total, "population missing");
            }
        }

        // 5. Advisory: negative daily cases are published as corrections upstream
        if let Some(cells) = table.column("new_cases") {
            let negatives = cells
                .filter(|c| c.as_number().is_some_and(|n| n < 0.0))
                .count();
            rules.advisory(
                "new_cases >= 0",
                negatives == 0,
                negatives,
                "upstream revisions",
            );
        }

        // 6. Advisory: no observation dated in the future
        if let Some(cells) = table.column("date") {
            let max_date = cells.filter_map(Cell::as_date).max();
            let ok = max_date.is_some_and(|d| d <= today);
            let note = match max_date {
                Some(d) => format!("max_date={d}"),
                None => "max_date=none".to_string(),
            };
            rules.advisory("max(date) <= today", ok, 0, note);
        }

        let report = rules.finish();
        debug!(
            passed = report.passed,
            blocking_failures = report.blocking_failures().count(),
            advisory_failures = report.advisory_failures().count(),
            "Schema validation evaluated"
        );
        report
    }
}

fn cell_key(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Number(n) if n.is_nan() => None,
        Cell::Number(n) => Some(n.to_string()),
        Cell::Text(s) => Some(s.clone()),
    }
}
