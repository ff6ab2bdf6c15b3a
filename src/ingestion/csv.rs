//! CSV ingestion implementation.
//!
//! Some field sheets are exported as CSV with the same layout as the
//! workbooks: a title/metadata line first, then the header row, then data.
//! The banner line is dropped before handing the remainder to the CSV reader.
//!
//! The directory walker does not dispatch CSV files; this entry point is for
//! callers ingesting individual exports.

use std::fs;
use std::path::Path;

use crate::error::IngestionResult;
use crate::types::Table;

/// Ingest a CSV export into a [`Table`].
///
/// The first line is skipped, the second provides the column names, and the
/// remaining records become rows. The same per-column numeric coercion as the
/// instrument log parser applies. Ragged records propagate as CSV errors.
pub fn parse_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let text = fs::read_to_string(path)?;
    let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    parse_csv_body(body)
}

fn parse_csv_body(body: &str) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let names: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(Table::from_text_rows(names, rows))
}

#[cfg(test)]
mod tests {
    use super::parse_csv_body;
    use crate::types::Value;

    #[test]
    fn header_row_follows_the_skipped_banner() {
        // parse_csv_from_path strips the banner before this point.
        let table = parse_csv_body("Plot,pH,Moisture\nP1,6.8,0.31\nP2,7.1,0.28\n").unwrap();

        assert_eq!(table.column_names(), vec!["Plot", "pH", "Moisture"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.column(1).unwrap().is_numeric());
        assert_eq!(table.cell(0, 1), Some(Value::Float64(6.8)));
    }

    #[test]
    fn ragged_records_are_a_csv_error() {
        assert!(parse_csv_body("a,b\n1\n").is_err());
    }
}
