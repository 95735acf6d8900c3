// epiwatch-core/src/domain/table/raw.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single value of the raw source table.
///
/// Sources are schemaless: most adapters hand over text and let the domain
/// coerce it (`as_number`, `as_date`) the same way everywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Empty or whitespace-only text is a missing value.
    pub fn from_text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Number(n) => n.is_nan(),
            Cell::Text(_) => false,
        }
    }

    /// Numeric coercion. Non-numeric text and NaN yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        }
    }

    /// Calendar-date coercion. Unparseable values yield `None`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from_text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Header normalization shared by loaders and [`RawTable::normalize_columns`]:
/// trimmed, lower-cased, `country` renamed to `location` when no `location`
/// column exists.
pub fn normalize_column_names(columns: &[String]) -> Vec<String> {
    let mut out: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();
    if !out.iter().any(|c| c == "location")
        && let Some(idx) = out.iter().position(|c| c == "country")
    {
        out[idx] = "location".to_string();
    }
    out
}

/// Parses the date layouts found in public CSV exports.
/// Time components are discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// In-memory, row-oriented snapshot of the source table.
///
/// Column set is heterogeneous; every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Rows shorter than the header are padded with `Null`, longer rows are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor from string literals (empty string = null).
    pub fn from_text_rows(columns: &[&str], rows: &[Vec<&str>]) -> Self {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::from_text(*v)).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom. `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Lower-cases and trims column names, then renames `country` to
    /// `location` when no `location` column exists.
    pub fn normalize_columns(mut self) -> Self {
        self.columns = normalize_column_names(&self.columns);
        self
    }

    /// Keeps the rows matching `keep`, preserving order.
    pub fn filter_rows<F>(&self, mut keep: F) -> RawTable
    where
        F: FnMut(&[Cell]) -> bool,
    {
        RawTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_columns_trims_and_lowercases() {
        let table = RawTable::from_text_rows(&[" Location ", "DATE"], &[vec!["Peru", "2021-01-01"]])
            .normalize_columns();
        assert_eq!(table.columns(), ["location", "date"]);
    }

    #[test]
    fn test_country_alias_becomes_location() {
        let table = RawTable::from_text_rows(&["Country", "date"], &[vec!["Ecuador", "2021-01-01"]])
            .normalize_columns();
        assert!(table.has_column("location"));
        assert!(!table.has_column("country"));
    }

    #[test]
    fn test_country_kept_when_location_present() {
        let table = RawTable::from_text_rows(
            &["location", "country"],
            &[vec!["Ecuador", "EC"]],
        )
        .normalize_columns();
        assert_eq!(table.columns(), ["location", "country"]);
    }

    #[test]
    fn test_cell_coercions() {
        assert_eq!(Cell::from_text("  ").as_number(), None);
        assert!(Cell::from_text("").is_null());
        assert_eq!(Cell::from_text(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(Cell::from_text("abc").as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(
            Cell::from_text("2021-03-04").as_date(),
            NaiveDate::from_ymd_opt(2021, 3, 4)
        );
        assert_eq!(Cell::from_text("not a date").as_date(), None);
    }

    #[test]
    fn test_parse_date_with_time_component() {
        assert_eq!(
            parse_date("2022-12-31 00:00:00"),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
        assert_eq!(
            parse_date("2022-12-31T10:00:00+02:00"),
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
    }

    #[test]
    fn test_rows_are_padded_to_header_width() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::from_text("x")]],
        );
        assert_eq!(table.rows()[0], vec![Cell::from_text("x"), Cell::Null]);
    }
}
