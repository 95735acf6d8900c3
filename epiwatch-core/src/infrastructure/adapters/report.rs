// epiwatch-core/src/infrastructure/adapters/report.rs

use async_trait::async_trait;
use duckdb::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::table::{CanonicalRecord, GrowthMetric, IncidenceMetric};
use crate::error::EpiwatchError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::sink::ReportSink;

pub const CANONICAL_TABLE: &str = "canonical_data";
pub const INCIDENCE_TABLE: &str = "incidence_7d";
pub const GROWTH_TABLE: &str = "growth_factor_7d";

const SCHEMA_SQL: &str = "
CREATE TABLE canonical_data (
    location VARCHAR NOT NULL,
    date DATE NOT NULL,
    new_cases DOUBLE NOT NULL,
    people_vaccinated DOUBLE NOT NULL,
    population DOUBLE
);
CREATE TABLE incidence_7d (
    date DATE NOT NULL,
    location VARCHAR NOT NULL,
    incidence_7d DOUBLE NOT NULL
);
CREATE TABLE growth_factor_7d (
    week_end_date DATE NOT NULL,
    location VARCHAR NOT NULL,
    weekly_cases DOUBLE NOT NULL,
    growth_factor_7d DOUBLE NOT NULL
);
";

/// Writes the three result tables into a single DuckDB database file.
///
/// The database is built under a staging name and renamed into place, so
/// readers never observe a half-written report.
pub struct DuckDBReportSink {
    path: PathBuf,
}

impl DuckDBReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write_blocking(
        &self,
        canonical: &[CanonicalRecord],
        incidence: &[IncidenceMetric],
        growth: &[GrowthMetric],
    ) -> Result<PathBuf, InfrastructureError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("duckdb.partial");
        remove_if_exists(&staging)?;
        remove_if_exists(&wal_path(&staging))?;

        {
            let conn = Connection::open(&staging)?;
            conn.execute_batch(SCHEMA_SQL)?;
            conn.execute_batch("BEGIN TRANSACTION;")?;
            insert_canonical(&conn, canonical)?;
            insert_incidence(&conn, incidence)?;
            insert_growth(&conn, growth)?;
            conn.execute_batch("COMMIT; CHECKPOINT;")?;
        }

        // Un WAL orphelin serait rejoué sur la nouvelle base
        remove_if_exists(&wal_path(&self.path))?;
        fs::rename(&staging, &self.path)?;
        remove_if_exists(&wal_path(&staging))?;

        info!(
            canonical = canonical.len(),
            incidence = incidence.len(),
            growth = growth.len(),
            "Report written"
        );
        Ok(self.path.clone())
    }
}

#[async_trait]
impl ReportSink for DuckDBReportSink {
    async fn write(
        &self,
        canonical: &[CanonicalRecord],
        incidence: &[IncidenceMetric],
        growth: &[GrowthMetric],
    ) -> Result<PathBuf, EpiwatchError> {
        Ok(self.write_blocking(canonical, incidence, growth)?)
    }
}

fn insert_canonical(conn: &Connection, rows: &[CanonicalRecord]) -> Result<(), InfrastructureError> {
    let mut stmt =
        conn.prepare("INSERT INTO canonical_data VALUES (?, CAST(? AS DATE), ?, ?, ?)")?;
    for r in rows {
        stmt.execute(params![
            r.location,
            r.date.to_string(),
            r.new_cases,
            r.people_vaccinated,
            r.population
        ])?;
    }
    Ok(())
}

fn insert_incidence(conn: &Connection, rows: &[IncidenceMetric]) -> Result<(), InfrastructureError> {
    let mut stmt = conn.prepare("INSERT INTO incidence_7d VALUES (CAST(? AS DATE), ?, ?)")?;
    for r in rows {
        stmt.execute(params![r.date.to_string(), r.location, r.incidence_7d])?;
    }
    Ok(())
}

fn insert_growth(conn: &Connection, rows: &[GrowthMetric]) -> Result<(), InfrastructureError> {
    let mut stmt = conn.prepare("INSERT INTO growth_factor_7d VALUES (CAST(? AS DATE), ?, ?, ?)")?;
    for r in rows {
        stmt.execute(params![
            r.week_end_date.to_string(),
            r.location,
            r.weekly_cases,
            r.growth_factor_7d
        ])?;
    }
    Ok(())
}

fn wal_path(db: &Path) -> PathBuf {
    let mut name = db.as_os_str().to_owned();
    name.push(".wal");
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<(), InfrastructureError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(InfrastructureError::Io(e)),
    }
}
