// epiwatch-core/src/infrastructure/config/mod.rs

pub mod project;

pub use crate::domain::project::PipelineConfig;
pub use project::{load_pipeline_config, load_pipeline_config_with};
