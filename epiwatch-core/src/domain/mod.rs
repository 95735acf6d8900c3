// epiwatch-core/src/domain/mod.rs

pub mod error;
pub mod metrics;
pub mod profile;
pub mod project;
pub mod quality;
pub mod table;
pub mod transform;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
