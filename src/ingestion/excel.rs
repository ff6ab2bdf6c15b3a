#![cfg(feature = "excel")]

//! Workbook (`.xlsx`) ingestion.
//!
//! Field workbooks put a title/metadata line in the first sheet row; the
//! second row holds the column headers and everything after it is data. The
//! chlorophyll-fluorescence sheets additionally flatten a two-level header
//! into 30 anonymous columns, which are reconstructed here from the fixed
//! sample/parameter layout of the instrument.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Column, Table};

/// Identifier substring marking a fluorescence workbook.
pub const FLUORESCENCE_CATEGORY: &str = "Fluorescence";

/// Outer level of the fluorescence header: one block per sample, plus the
/// plot average.
pub const FLUORESCENCE_SAMPLES: [&str; 6] = [
    "Sample1",
    "Sample2",
    "Sample3",
    "Sample4",
    "Sample5",
    "PlotAverage",
];

/// Inner level of the fluorescence header: the parameters recorded per sample.
pub const FLUORESCENCE_PARAMETERS: [&str; 5] = ["Fo", "Fv", "Fm", "Fv/Fm", "Fv/Fo"];

/// Number of leading sheet columns that keep their original headers.
const FLUORESCENCE_BASE_COLUMNS: usize = 3;

/// Ingest the first sheet of a workbook into a [`Table`].
///
/// The first sheet row is skipped (title/metadata), the second supplies the
/// column headers. If `identifier` marks a fluorescence workbook the header
/// set is replaced by the reconstructed two-level hierarchy; the sheet must
/// then have exactly `3 + 6*5 = 33` columns or the parse fails with a
/// data-contract violation.
pub fn parse_workbook_from_path(
    path: impl AsRef<Path>,
    identifier: &str,
) -> IngestionResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::HeaderShape {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range.rows();
    // Row 1 is a title/metadata row, not headers.
    rows.next();
    let header_row = rows.next().ok_or_else(|| IngestionError::HeaderShape {
        message: format!("sheet '{sheet}' has no header row"),
    })?;
    let headers: Vec<String> = header_row.iter().map(cell_to_header_string).collect();

    let data_rows: Vec<&[Data]> = rows.collect();

    let columns = if identifier.contains(FLUORESCENCE_CATEGORY) {
        fluorescence_columns(&sheet, &headers, &data_rows)?
    } else {
        plain_columns(&headers, &data_rows)
    };

    Ok(Table::new(columns))
}

fn plain_columns(headers: &[String], data_rows: &[&[Data]]) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| build_column(name.clone(), idx, data_rows))
        .collect()
}

/// Rebuild the compound fluorescence header: the first 3 sheet headers are
/// retained verbatim, the rest become the `sample x parameter` cross product
/// in fixed order.
fn fluorescence_columns(
    sheet: &str,
    headers: &[String],
    data_rows: &[&[Data]],
) -> IngestionResult<Vec<Column>> {
    let expected = FLUORESCENCE_BASE_COLUMNS + FLUORESCENCE_SAMPLES.len() * FLUORESCENCE_PARAMETERS.len();
    if headers.len() != expected {
        return Err(IngestionError::HeaderShape {
            message: format!(
                "sheet '{sheet}': fluorescence workbook must have exactly {expected} columns \
                 ({FLUORESCENCE_BASE_COLUMNS} base + {product} reconstructed), found {found}",
                product = expected - FLUORESCENCE_BASE_COLUMNS,
                found = headers.len()
            ),
        });
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .take(FLUORESCENCE_BASE_COLUMNS)
        .enumerate()
        .map(|(idx, name)| build_column(name.clone(), idx, data_rows))
        .collect();

    let mut idx = FLUORESCENCE_BASE_COLUMNS;
    for sample in FLUORESCENCE_SAMPLES {
        for parameter in FLUORESCENCE_PARAMETERS {
            columns.push(build_column(parameter.to_string(), idx, data_rows).with_group(sample));
            idx += 1;
        }
    }

    Ok(columns)
}

/// Collect column `idx` of the data rows, typed by its cells: numeric if every
/// non-empty cell is a number, text otherwise. Short rows pad with empty cells.
fn build_column(name: String, idx: usize, data_rows: &[&[Data]]) -> Column {
    let cells: Vec<&Data> = data_rows
        .iter()
        .map(|row| row.get(idx).unwrap_or(&Data::Empty))
        .collect();

    let all_numeric = cells
        .iter()
        .all(|c| matches!(c, Data::Empty | Data::Float(_) | Data::Int(_)));

    if all_numeric {
        let values = cells
            .iter()
            .map(|c| match c {
                Data::Float(f) => Some(*f),
                Data::Int(i) => Some(*i as f64),
                _ => None,
            })
            .collect();
        Column::numeric(name, values)
    } else {
        let values = cells
            .iter()
            .map(|c| match c {
                Data::Empty => None,
                other => Some(cell_to_string(other)),
            })
            .collect();
        Column::text(name, values)
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
