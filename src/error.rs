use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across the walker, the per-format parsers
/// and the auxiliary spectra generator.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook ingestion error (feature-gated behind `excel`).
    #[error("workbook error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook reading was requested but the crate was built without it.
    ///
    /// The walker treats this as skip-with-warning rather than aborting the run.
    #[error("workbook ingestion not enabled (enable cargo feature 'excel')")]
    ExcelUnavailable,

    /// A line passed the data-line filter but did not split into the fixed
    /// field count of the instrument log format.
    #[error(
        "malformed instrument log line {line} in {}: expected {expected} fields, found {found}",
        .path.display()
    )]
    MalformedLine {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The sheet/file header row does not satisfy a shape contract
    /// (missing header row, wrong fluorescence column count, ragged rows).
    #[error("header mismatch: {message}")]
    HeaderShape { message: String },

    /// The containing directory does not have the expected `site/scale/site-year`
    /// layout beneath the ingestion root.
    #[error("site layout error for {}: {message}", .path.display())]
    SiteLayout { path: PathBuf, message: String },

    /// An identifier does not carry the structure a consumer requires
    /// (e.g. no date segment for spectra generation).
    #[error("identifier '{identifier}': {message}")]
    IdentifierFormat { identifier: String, message: String },

    /// A second table arrived under an identifier that is already registered.
    ///
    /// Never returned from `extract_tables`; reported through the observer and
    /// the first table is retained.
    #[error("duplicate identifier '{identifier}': keeping the first table")]
    DuplicateIdentifier { identifier: String },
}
