// epiwatch-core/src/application/mod.rs

pub mod artifacts;
pub mod clean;
pub mod pipeline;
pub mod ports;
pub mod profile;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire `use epiwatch_core::application::{run_pipeline, clean_project};`
// sans connaître la structure interne des fichiers.

pub use artifacts::{VALIDATION_REPORT_TEMPLATE, write_validation_artifacts};
pub use clean::clean_project;
pub use pipeline::{RunResult, run_pipeline};
pub use profile::run_profile;
pub use validation::run_validation;
