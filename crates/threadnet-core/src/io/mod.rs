//! File-format dispatch for tables.
//!
//! Only two formats are supported, chosen by file extension
//! (case-insensitive): `.csv` and `.xlsx`. Anything else is rejected with
//! [`TableError::UnsupportedFormat`] before the file is touched.

pub mod csv;
pub mod xlsx;

use std::path::Path;

use crate::error::{Result, TableError};
use crate::table::Table;

/// Supported on-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Office Open XML workbook; first worksheet, first row as header.
    Xlsx,
}

impl FileFormat {
    /// Detect the format from `path`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read a table from `path`, dispatching on its extension.
///
/// # Errors
///
/// Returns an error for unsupported extensions or any read/parse failure.
pub fn read_table(path: &Path) -> Result<Table> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::read(path),
        FileFormat::Xlsx => xlsx::read(path),
    }
}

/// Write `table` to `path`, dispatching on its extension.
///
/// # Errors
///
/// Returns an error for unsupported extensions or any write failure.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => csv::write(table, path),
        FileFormat::Xlsx => xlsx::write(table, path),
    }
}
