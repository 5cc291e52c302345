//! Taxo Table - Tabular loading, validation, and writing
//!
//! Reads a CSV file with a header row into an in-memory [`Table`], validates
//! that requested columns exist, and writes tables back out as CSV. The
//! input table is loaded once per run and stays immutable apart from columns
//! appended by the pipeline.

use std::fs;
use std::io;
use std::path::Path;

use taxo_core::{Result, TaxoError};

/// An in-memory table: one header row plus data rows of string cells.
///
/// Rows are kept in input order; every row has exactly as many cells as
/// there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header row
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its index.
    ///
    /// The error message enumerates all actual column names so the caller
    /// can self-correct.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TaxoError::MissingColumn {
                column: name.to_string(),
                available: self.headers.join(", "),
            })
    }

    /// Append a column.
    ///
    /// `values` must hold one cell per existing row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
}

/// Read a CSV file with a header row into a [`Table`].
///
/// Fails with [`TaxoError::NotFound`] if the path does not exist and
/// [`TaxoError::Parse`] if the content cannot be parsed as CSV (ragged
/// records, invalid UTF-8, missing header). No side effects beyond reading.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TaxoError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| TaxoError::Parse(format!("{}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| TaxoError::Parse(format!("{}: {}", path.display(), e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| TaxoError::Parse(format!("{}: {}", path.display(), e)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Write a [`Table`] as CSV, creating missing parent directories first.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TaxoError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_io(path, e))?;
    writer
        .write_record(&table.headers)
        .map_err(|e| csv_io(path, e))?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| csv_io(path, e))?;
    }
    writer.flush().map_err(|e| TaxoError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn csv_io(path: &Path, err: csv::Error) -> TaxoError {
    TaxoError::Io {
        path: path.display().to_string(),
        source: io::Error::other(err),
    }
}
