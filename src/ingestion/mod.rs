//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`extract_tables`] (from [`walker`]) which:
//!
//! - recursively walks the campaign tree and classifies files by name
//! - derives the site-aware identifier for each matched file
//! - parses into an in-memory [`crate::types::Table`] and registers it
//! - optionally reports outcomes to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`prn`]
//! - [`csv`]
//! - [`excel`] (feature-gated behind `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod prn;
pub mod site;
pub mod walker;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionStats,
};
pub use prn::{parse_instrument_log, DataLine, DataLines, INSTRUMENT_LOG_COLUMNS};
pub use site::{parse_site_directory, RawFileRef, SiteDirectory};
pub use walker::{classify_file_name, extract_tables, IngestionOptions, SourceFormat};
