//! Fixed-format instrument log (`.PRN`) ingestion.
//!
//! PRN files come straight off the instrument and mix banner/header lines,
//! data rows and footer summaries in one text file. A data row starts with a
//! numeric timestamp field and contains a clock-style time value, so the
//! filter keeps exactly the lines whose first character is an ASCII digit and
//! that contain a `:`. Each data row carries the fixed 9-field record of the
//! LAI instrument.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

/// Column names of the instrument log format, in record order.
pub const INSTRUMENT_LOG_COLUMNS: [&str; 9] = [
    "Time",
    "Plot",
    "Sample",
    "Transmitted",
    "Spread",
    "Incident",
    "BeamFrac",
    "Zenith",
    "LAI",
];

/// A data line accepted by the filter, with its 1-based source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    /// 1-based line number in the source file.
    pub number: usize,
    /// Line content, without the trailing newline.
    pub text: String,
}

/// Lazy iterator over the data lines of a PRN file.
///
/// Header and footer noise is discarded; the iterator terminates at
/// end-of-file. Re-opening the same path re-reads from the start, so the
/// sequence is restartable and holds no state between openings.
#[derive(Debug)]
pub struct DataLines {
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl DataLines {
    /// Open `path` and position the filter at the start of the file.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }
}

impl Iterator for DataLines {
    type Item = io::Result<DataLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.line_number += 1;
            if is_data_line(&line) {
                return Some(Ok(DataLine {
                    number: self.line_number,
                    text: line,
                }));
            }
        }
    }
}

/// True for lines whose first character is an ASCII digit and that contain `:`.
pub fn is_data_line(line: &str) -> bool {
    line.as_bytes().first().is_some_and(u8::is_ascii_digit) && line.contains(':')
}

/// Ingest a PRN instrument log into a [`Table`].
///
/// The table always has the 9 columns of [`INSTRUMENT_LOG_COLUMNS`], in that
/// order, with rows in file order. Numeric coercion is applied per column
/// after all rows are collected; the `Time` column keeps its clock strings.
///
/// A filtered line that does not split into exactly 9 whitespace-delimited
/// fields is a fatal [`IngestionError::MalformedLine`] — the content heuristic
/// can admit free text containing a time-like substring, and no recovery is
/// attempted for such lines.
pub fn parse_instrument_log(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let path = path.as_ref();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in DataLines::open(path)? {
        let line = line?;
        let fields: Vec<String> = line.text.split_whitespace().map(str::to_owned).collect();
        if fields.len() != INSTRUMENT_LOG_COLUMNS.len() {
            return Err(IngestionError::MalformedLine {
                path: path.to_path_buf(),
                line: line.number,
                expected: INSTRUMENT_LOG_COLUMNS.len(),
                found: fields.len(),
            });
        }
        rows.push(fields);
    }

    let names = INSTRUMENT_LOG_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect();
    Ok(Table::from_text_rows(names, rows))
}
