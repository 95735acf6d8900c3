// epiwatch-core/src/infrastructure/adapters/duckdb.rs

use duckdb::{Config, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::domain::table::{Cell, RawTable, normalize_column_names};
use crate::infrastructure::error::InfrastructureError;

/// Thin wrapper around a DuckDB connection used as the CSV reader.
///
/// Every column is read as VARCHAR (`all_varchar = true`): typing is the
/// domain's job, so a stray "n/a" never makes the whole load fail.
pub struct DuckDBEngine {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBEngine {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned")))
    }

    /// Loads a CSV file into a [`RawTable`], header names untouched.
    pub fn load_csv(&self, path: &Path) -> Result<RawTable, InfrastructureError> {
        Ok(self.load_csv_columns(path, None)?.table)
    }

    /// Loads only the columns whose normalized name (see
    /// [`normalize_column_names`]) is listed in `keep`; `None` keeps them all.
    /// The full header is returned alongside.
    pub fn load_csv_columns(
        &self,
        path: &Path,
        keep: Option<&[String]>,
    ) -> Result<CsvLoad, InfrastructureError> {
        if !path.exists() {
            return Err(InfrastructureError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("CSV file not found: {}", path.display()),
            )));
        }

        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE OR REPLACE TEMP VIEW raw_source AS \
             SELECT * FROM read_csv_auto({}, header = true, all_varchar = true)",
            sql_literal(&path.to_string_lossy())
        ))?;

        let header: Vec<String> = {
            let mut stmt =
                conn.prepare("SELECT name FROM pragma_table_info('raw_source') ORDER BY cid")?;
            stmt.query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?
        };

        let columns: Vec<String> = match keep {
            None => header.clone(),
            Some(keep) => header
                .iter()
                .zip(normalize_column_names(&header))
                .filter(|(_, normalized)| keep.contains(normalized))
                .map(|(raw, _)| raw.clone())
                .collect(),
        };

        let width = columns.len();
        let rows: Vec<Vec<Cell>> = if width == 0 {
            let count: i64 = conn.query_row("SELECT count(*) FROM raw_source", [], |r| r.get(0))?;
            vec![Vec::new(); usize::try_from(count).unwrap_or(0)]
        } else {
            let select = columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = conn.prepare(&format!("SELECT {select} FROM raw_source"))?;
            stmt.query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Option<String>>(i).map(Cell::from))
                    .collect::<Result<Vec<Cell>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?
        };

        debug!(
            path = %path.display(),
            header = header.len(),
            loaded = width,
            rows = rows.len(),
            "CSV loaded via DuckDB"
        );
        Ok(CsvLoad {
            table: RawTable::new(columns, rows),
            header,
        })
    }
}

/// A loaded CSV: the (possibly projected) table plus every header name.
#[derive(Debug, Clone)]
pub struct CsvLoad {
    pub table: RawTable,
    pub header: Vec<String>,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a value as a SQL string literal.
pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
