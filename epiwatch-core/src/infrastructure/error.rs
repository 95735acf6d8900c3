// epiwatch-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(epiwatch::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(epiwatch::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(epiwatch::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(epiwatch::infra::config))]
    ConfigError(String),

    // --- SOURCE (HTTP + fallback) ---
    #[error("HTTP Error: {0}")]
    #[diagnostic(code(epiwatch::infra::http))]
    Http(#[from] reqwest::Error),

    #[error("No source available. Remote: {remote}. Fallback: {fallback}")]
    #[diagnostic(
        code(epiwatch::infra::source_unavailable),
        help("Check COVID_SOURCE_URL / network access, or provide COVID_LOCAL_FALLBACK.")
    )]
    SourceUnavailable { remote: String, fallback: String },

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(code(epiwatch::infra::template))]
    TemplateError(#[from] minijinja::Error),

    // --- CSV (profile export) ---
    #[error("CSV Error: {0}")]
    #[diagnostic(code(epiwatch::infra::csv))]
    Csv(#[from] csv::Error),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
