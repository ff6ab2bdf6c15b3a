//! Core data model types for ingestion.
//!
//! Every source file is parsed into a [`Table`]: an ordered list of named
//! [`Column`]s of equal length. Column storage is typed per column rather than
//! per cell ([`ColumnValues`]), so callers can tell "every value parsed as a
//! number" apart from "left as text" without inspecting individual cells.

use serde::Serialize;

/// A single cell value, as seen through [`Table::cell`] / [`Column::value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

/// Typed storage for one column.
///
/// `None` entries are empty cells in either representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnValues {
    /// Every non-empty cell parsed as a number.
    Numeric(Vec<Option<f64>>),
    /// Cells kept as text (non-numeric, or mixed).
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of cells (including empty ones).
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    /// True if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single named column in a [`Table`].
///
/// `group` carries the outer level for compound headers (the fluorescence
/// `Sample1..PlotAverage` level); ordinary columns have `group = None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Outer header label, if the column belongs to a two-level header.
    pub group: Option<String>,
    /// Column name (the inner label for two-level headers).
    pub name: String,
    /// Cell storage.
    pub values: ColumnValues,
}

impl Column {
    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            group: None,
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    /// Create a text column.
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            group: None,
            name: name.into(),
            values: ColumnValues::Text(values),
        }
    }

    /// Attach an outer header label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if every non-empty cell parsed as a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    /// Display label: `group:name` for two-level headers, `name` otherwise.
    pub fn display_name(&self) -> String {
        match &self.group {
            Some(group) => format!("{group}:{name}", name = self.name),
            None => self.name.clone(),
        }
    }

    /// Cell at `row`, or `None` past the end.
    pub fn value(&self, row: usize) -> Option<Value> {
        match &self.values {
            ColumnValues::Numeric(v) => v
                .get(row)
                .map(|c| c.map(Value::Float64).unwrap_or(Value::Null)),
            ColumnValues::Text(v) => v
                .get(row)
                .map(|c| c.clone().map(Value::Utf8).unwrap_or(Value::Null)),
        }
    }
}

/// In-memory tabular representation of one source file.
///
/// Columns are stored in source order and all hold the same number of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns.
    ///
    /// # Panics
    ///
    /// Panics if the columns do not all have the same length.
    pub fn new(columns: Vec<Column>) -> Self {
        if let Some(first) = columns.first() {
            let rows = first.len();
            for col in &columns {
                assert!(
                    col.len() == rows,
                    "column '{}' has {} cells, expected {}",
                    col.name,
                    col.len(),
                    rows
                );
            }
        }
        Self { columns }
    }

    /// Build a table from text rows, applying per-column numeric coercion.
    ///
    /// A column becomes [`ColumnValues::Numeric`] only if every non-empty cell
    /// parses as `f64`; otherwise it stays text. Empty cells turn into `None`
    /// either way and do not block coercion. Coercion never fails: a column
    /// that does not parse is simply left as text.
    ///
    /// Rows shorter than the header are padded with empty cells.
    pub fn from_text_rows(names: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| {
                        row.get(idx)
                            .map(|s| s.trim())
                            .filter(|s| !s.is_empty())
                            .map(str::to_owned)
                    })
                    .collect();
                coerce_column(name, cells)
            })
            .collect();
        Self::new(columns)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Columns in source order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at `idx`.
    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    /// Returns the index of the first column whose name matches, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Display labels of all columns, in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(Column::display_name).collect()
    }

    /// Cell at `(row, col)`, or `None` if either index is out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<Value> {
        self.columns.get(col)?.value(row)
    }
}

fn coerce_column(name: String, cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| match c {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::text(name, cells),
    }
}
