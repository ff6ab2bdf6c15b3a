//! Directory walker: traversal, classification and dispatch.
//!
//! [`extract_tables`] drives one ingestion run: it visits every file beneath
//! the root, classifies it by name, derives the site-aware identifier, parses
//! with the matching format parser and inserts the result into the caller's
//! [`Registry`]. Traversal is strictly sequential and depth-first; each file
//! is read to completion before the next is visited.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{IngestionError, IngestionResult};
use crate::registry::{InsertOutcome, Registry};
use crate::types::Table;

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::prn;
use super::site::RawFileRef;

/// Workbook file extension (exact match).
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Instrument log file extension (exact match; the instrument writes it
/// upper-case).
pub const INSTRUMENT_LOG_EXTENSION: &str = "PRN";

/// Source formats the walker dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Excel workbook (`.xlsx`).
    Workbook,
    /// Fixed-format instrument text log (`.PRN`).
    InstrumentLog,
}

/// Classify a file name, applying the exclusion guard.
///
/// Names starting with `~` or `$` are editor lock/recovery artifacts and are
/// never classified; nor are files with any other extension. Returning `None`
/// is the deliberate silent-skip path, not an error.
pub fn classify_file_name(file_name: &str) -> Option<SourceFormat> {
    if file_name.starts_with('~') || file_name.starts_with('$') {
        return None;
    }
    match Path::new(file_name).extension()?.to_str()? {
        ext if ext == WORKBOOK_EXTENSION => Some(SourceFormat::Workbook),
        ext if ext == INSTRUMENT_LOG_EXTENSION => Some(SourceFormat::InstrumentLog),
        _ => None,
    }
}

/// Options controlling a walker run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Walk `root` and populate `registry` with one [`Table`] per matched file.
///
/// - Workbook and instrument log files are dispatched to their parsers; all
///   other files are skipped silently.
/// - Duplicate identifiers and missing workbook capability are reported to the
///   observer as warnings and the walk continues.
/// - Any other parser or traversal error aborts the run; tables registered
///   before the failure stay in `registry`.
///
/// Calling this twice with the same `registry` accumulates across both runs;
/// construct a fresh [`Registry`] per logical run to avoid cross-run keys.
pub fn extract_tables(
    root: impl AsRef<Path>,
    registry: &mut Registry,
    options: &IngestionOptions,
) -> IngestionResult<()> {
    let root = root.as_ref();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(format) = classify_file_name(file_name) else {
            continue;
        };
        let Some(directory) = entry.path().parent() else {
            continue;
        };

        let file_ref = RawFileRef {
            root,
            directory,
            file_name,
        };
        let full_path = file_ref.full_path();
        let identifier = file_ref.identifier()?;

        let ctx = IngestionContext {
            path: full_path.clone(),
            format,
            identifier: identifier.clone(),
        };

        let result = match format {
            SourceFormat::Workbook => parse_workbook_dispatch(&full_path, &identifier),
            SourceFormat::InstrumentLog => prn::parse_instrument_log(&full_path),
        };

        match result {
            Ok(table) => {
                let rows = table.row_count();
                match registry.insert(identifier.clone(), table) {
                    InsertOutcome::RejectedDuplicate => {
                        report_skip(options, &ctx, &IngestionError::DuplicateIdentifier { identifier });
                    }
                    InsertOutcome::Inserted | InsertOutcome::Replaced => {
                        report_success(options, &ctx, rows);
                    }
                }
            }
            Err(IngestionError::ExcelUnavailable) => {
                report_skip(options, &ctx, &IngestionError::ExcelUnavailable);
            }
            Err(e) => {
                report_failure(options, &ctx, &e);
                return Err(e);
            }
        }
    }

    Ok(())
}

fn parse_workbook_dispatch(path: &Path, identifier: &str) -> IngestionResult<Table> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, identifier);

    #[cfg(feature = "excel")]
    {
        super::excel::parse_workbook_from_path(path, identifier)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::ExcelUnavailable)
    }
}

fn report_success(options: &IngestionOptions, ctx: &IngestionContext, rows: usize) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_success(ctx, IngestionStats { rows });
    }
}

fn report_skip(options: &IngestionOptions, ctx: &IngestionContext, warning: &IngestionError) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_skip(ctx, warning);
    }
}

fn report_failure(options: &IngestionOptions, ctx: &IngestionContext, error: &IngestionError) {
    if let Some(obs) = options.observer.as_ref() {
        let severity = severity_for_error(error);
        obs.on_failure(ctx, severity, error);
        if severity >= options.alert_at_or_above {
            obs.on_alert(ctx, severity, error);
        }
    }
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::ExcelUnavailable | IngestionError::DuplicateIdentifier { .. } => {
            IngestionSeverity::Warning
        }
        IngestionError::MalformedLine { .. }
        | IngestionError::HeaderShape { .. }
        | IngestionError::SiteLayout { .. }
        | IngestionError::IdentifierFormat { .. } => IngestionSeverity::Error,
    }
}
