//! Dummy pico-spectra placeholders for ancillary-only plots.
//!
//! The spectral database expects one pico file per `(plot, date)` pair. Plots
//! that only have ancillary measurements get a fixed placeholder document so
//! the loader can attach the ancillary tables to something. LAI tables are
//! excluded (the PRN-derived tables have no plot-name column in the expected
//! position), and existing placeholder files are never overwritten.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{IngestionError, IngestionResult};
use crate::registry::Registry;
use crate::types::{Table, Value};

/// Identifier substring marking tables excluded from spectra generation.
pub const EXCLUDED_CATEGORY: &str = "LAI";

/// File extension of the generated placeholders.
pub const PLACEHOLDER_EXTENSION: &str = "pico";

/// Ordinal of the date token in an `_`-separated identifier.
const DATE_SEGMENT_INDEX: usize = 2;

/// Render the fixed placeholder document.
///
/// One all-dummy spectrum: zeroed metadata, a single zero pixel.
pub fn placeholder_document() -> String {
    let doc = json!({
        "SequenceNumber": 0,
        "Spectra": [
            {
                "Metadata": {
                    "Batch": 0,
                    "Dark": false,
                    "Datetime": "2000-01-00T00:00:00.000000Z",
                    "Direction": "none",
                    "IntegrationTime": 0.0,
                    "IntegrationTimeUnits": "none",
                    "NonlinearityCorrectionCoefficients": [0],
                    "OpticalPixelRange": [0],
                    "Run": "dummy",
                    "SaturationLevel": 0,
                    "SerialNumber": "QEP01651",
                    "TemperatureDetectorActual": 0.0,
                    "TemperatureDetectorSet": 0.0,
                    "TemperatureHeatsink": null,
                    "TemperatureMicrocontroller": 0.0,
                    "TemperaturePCB": 0.0,
                    "TemperatureUnits": "degrees Celcius",
                    "Type": "light",
                    "WavelengthCalibrationCoefficients": [0],
                    "name": "none"
                },
                "Pixels": [0]
            }
        ]
    });
    serde_json::to_string_pretty(&doc).expect("static document serializes")
}

/// Write one placeholder per unique `(plot, date)` pair found in `registry`.
///
/// The date comes from the identifier (third `_`-separated token); the plot
/// name from the first column of each row. Files that already exist are left
/// untouched, so re-running against a grown registry only adds new
/// placeholders. Returns the paths created by this call.
pub fn generate_dummy_spectra(
    registry: &Registry,
    out_dir: impl AsRef<Path>,
) -> IngestionResult<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    if !out_dir.is_dir() {
        fs::create_dir_all(out_dir)?;
    }

    let mut plot_ids: BTreeSet<String> = BTreeSet::new();
    for (identifier, table) in registry.iter() {
        if identifier.contains(EXCLUDED_CATEGORY) {
            continue;
        }
        let date = date_token(identifier)?;
        for plot in plot_names(table) {
            plot_ids.insert(format!("{plot}_{date}"));
        }
    }

    let document = placeholder_document();
    let mut created = Vec::new();
    for plot_id in plot_ids {
        let path = out_dir.join(format!("{plot_id}.{PLACEHOLDER_EXTENSION}"));
        if path.exists() {
            continue;
        }
        fs::write(&path, &document)?;
        created.push(path);
    }

    Ok(created)
}

/// Date token of an identifier: the segment at index 2 when split on `_`,
/// e.g. `20170714` in `ES_F1_20170714_SPAD`.
pub fn date_token(identifier: &str) -> IngestionResult<&str> {
    identifier
        .split('_')
        .nth(DATE_SEGMENT_INDEX)
        .ok_or_else(|| IngestionError::IdentifierFormat {
            identifier: identifier.to_string(),
            message: format!("has no date segment at index {DATE_SEGMENT_INDEX}"),
        })
}

/// Plot names from the first column; rows with an empty plot cell are skipped.
fn plot_names(table: &Table) -> Vec<String> {
    (0..table.row_count())
        .filter_map(|row| match table.cell(row, 0) {
            Some(Value::Utf8(s)) => Some(s),
            Some(Value::Float64(f)) => Some(render_number(f)),
            Some(Value::Null) | None => None,
        })
        .collect()
}

fn render_number(f: f64) -> String {
    if f.fract() == 0.0 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}
