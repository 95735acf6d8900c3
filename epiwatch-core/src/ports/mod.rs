// epiwatch-core/src/ports/mod.rs

pub mod sink;
pub mod source;

pub use sink::ReportSink;
pub use source::{RawTableSource, SourceOrigin, SourceSnapshot};
