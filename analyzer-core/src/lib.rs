pub mod catalog;
pub mod compare;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod identity;
pub mod report;

pub use catalog::{CatalogConnector, CatalogQuery, CatalogRow, ConnectionTarget, DatabaseKind};
pub use compare::{Analyzer, ColumnMatching, CompareOptions, FailurePolicy, analyze_targets};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, ErrorKind, Result};
pub use export::{ExportFormat, ReportHeader};
pub use report::{Category, ComparisonReport, DiffEntry, DiffValue, Locale};
