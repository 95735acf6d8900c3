// epiwatch-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod http;
pub mod report;
pub mod source;

pub use self::duckdb::DuckDBEngine;
pub use http::HttpFetcher;
pub use report::DuckDBReportSink;
pub use source::FallbackCsvSource;
