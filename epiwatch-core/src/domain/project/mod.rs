// epiwatch-core/src/domain/project/mod.rs

pub mod configuration;
pub use configuration::{PipelineConfig, QualityConfig, RangeGate, SourceConfig};
