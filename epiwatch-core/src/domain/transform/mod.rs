// epiwatch-core/src/domain/transform/mod.rs

pub mod normalizer;

pub use normalizer::{
    NormalizedDataset, REFERENCE_COUNTRY, REQUIRED_COLUMNS, TableNormalizer, require_columns,
};
