//! `ancil-ingest` reads raw field-campaign output into in-memory tables, keyed
//! by an identifier derived from each file's place in the campaign directory
//! tree, ready for a downstream database loader.
//!
//! The primary entrypoint is [`ingestion::extract_tables`], which walks a root
//! directory and populates a caller-owned [`registry::Registry`].
//!
//! ## What you can ingest
//!
//! **Files matched during a walk (classified by name):**
//!
//! - **Excel workbooks**: `.xlsx` (requires the Cargo feature `excel`; without
//!   it, workbook files are skipped with a warning)
//! - **Instrument logs**: `.PRN`, the raw fixed-format text files off the LAI
//!   instrument
//!
//! Names starting with `~` or `$` (editor lock/recovery files) are never
//! ingested; other extensions are skipped silently. CSV exports with the same
//! banner-then-header layout can be ingested directly via
//! [`ingestion::csv::parse_csv_from_path`], outside the walk.
//!
//! **Tables:**
//!
//! Parsing produces a [`types::Table`]: ordered, named columns of equal
//! length. Each column is typed as a whole ([`types::ColumnValues`]) — numeric
//! if every non-empty cell parsed as a number, text otherwise — so callers can
//! tell coerced columns from text columns without probing cells. All table
//! types are `serde::Serialize` for handing off to a loader.
//!
//! ## Quick example: ingest a campaign tree
//!
//! ```no_run
//! use ancil_ingest::ingestion::{extract_tables, IngestionOptions};
//! use ancil_ingest::registry::Registry;
//!
//! # fn main() -> Result<(), ancil_ingest::IngestionError> {
//! let mut registry = Registry::new();
//! extract_tables("DATA/", &mut registry, &IngestionOptions::default())?;
//! for (identifier, table) in registry.iter() {
//!     println!("{identifier}: {} rows", table.row_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Identifiers
//!
//! Campaign trees are laid out `<root>/<site>/<scale>/<site-code><year>/...`.
//! The identifier for a file is the site code (year suffix dropped) followed
//! by the file stem, e.g. `.../ES/field_scale/ES_F1_2017/plot_scale_data/LAI/`
//! `20170714_LAI.PRN` becomes `ES_F1_20170714_LAI`. See [`ingestion::site`].
//!
//! ## Duplicate policy
//!
//! The registry keeps the first table registered under an identifier; later
//! arrivals are rejected and reported as warnings. A designated test
//! identifier ([`registry::Registry::with_test_identifier`]) may be
//! overwritten, which keeps test fixtures repeatable.
//!
//! ## Modules
//!
//! - [`ingestion`]: the walker, the per-format parsers and observability hooks
//! - [`types`]: the in-memory table model
//! - [`registry`]: identifier-to-table mapping and duplicate policy
//! - [`spectra`]: dummy pico-spectra placeholders for ancillary-only plots
//! - [`error`]: error types used across ingestion

pub mod error;
pub mod ingestion;
pub mod registry;
pub mod spectra;
pub mod types;

pub use error::{IngestionError, IngestionResult};
pub use registry::Registry;
pub use types::Table;
