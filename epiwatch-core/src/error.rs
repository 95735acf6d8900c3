// epiwatch-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpiwatchError {
    // --- ERREURS DU DOMAINE (Colonnes manquantes, gate de plage, config) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, HTTP, DuckDB, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for EpiwatchError {
    fn from(err: std::io::Error) -> Self {
        EpiwatchError::Infrastructure(InfrastructureError::Io(err))
    }
}
