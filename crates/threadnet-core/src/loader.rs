//! Dataset loading, inspection, and saving.
//!
//! [`TableLoader`] owns the table for one data file. Every operation other
//! than [`TableLoader::load`] requires a successful load first and fails with
//! [`TableError::NotLoaded`] otherwise.
//!
//! ```rust,ignore
//! use threadnet_core::loader::TableLoader;
//!
//! let mut loader = TableLoader::new("data/messages.csv");
//! loader.load()?;
//! loader.convert_unix_timestamp("msg_date")?;
//! let summary = loader.summary()?;
//! loader.filter_columns(&["msg_author_id", "msg_topic_id", "msg_date"])?;
//! loader.save("out/processed.xlsx")?;
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::columns;
use crate::error::{Result, TableError};
use crate::io;
use crate::table::{Column, Table, Value};
use crate::timestamp::{self, UTC_FORMAT};

// ---------------------------------------------------------------------------
// DatasetSummary
// ---------------------------------------------------------------------------

/// Headline statistics for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Number of records.
    pub total_messages: usize,
    /// Distinct non-null `msg_author_id` values (0 if the column is absent).
    pub unique_authors: usize,
    /// Distinct non-null `msg_topic_id` values (0 if the column is absent).
    pub unique_topics: usize,
    /// Distinct non-null `msg_ip_address` values (0 if the column is absent).
    pub unique_ips: usize,
    /// All column headers in order.
    pub columns: Vec<String>,
    /// `(min, max)` of `msg_date`, when the column exists and has values.
    pub date_range: Option<(Value, Value)>,
}

impl DatasetSummary {
    /// Compute the summary of `table`.
    #[must_use]
    pub fn of(table: &Table) -> Self {
        let distinct = |name: &str| table.column(name).map_or(0, Column::distinct_count);
        Self {
            total_messages: table.row_count(),
            unique_authors: distinct(columns::AUTHOR),
            unique_topics: distinct(columns::TOPIC),
            unique_ips: distinct(columns::IP_ADDRESS),
            columns: table.column_names(),
            date_range: table.column(columns::DATE).and_then(Column::min_max),
        }
    }
}

// ---------------------------------------------------------------------------
// TableLoader
// ---------------------------------------------------------------------------

/// Loader and in-place editor for one dataset file.
#[derive(Debug, Clone)]
pub struct TableLoader {
    data_path: PathBuf,
    table: Option<Table>,
}

impl TableLoader {
    /// Create a loader for `data_path`. Nothing is read until [`Self::load`].
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            table: None,
        }
    }

    /// Wrap an already-built table (no file behind it).
    pub fn from_table(table: Table) -> Self {
        Self {
            data_path: PathBuf::new(),
            table: Some(table),
        }
    }

    /// Path this loader reads from.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Read the data file, replacing any previously loaded table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnsupportedFormat`] for extensions other than
    /// `.csv`/`.xlsx`, and propagates read and parse failures.
    #[instrument(skip(self), fields(path = %self.data_path.display()))]
    pub fn load(&mut self) -> Result<&Table> {
        let table = io::read_table(&self.data_path)?;

        let (rows, cols) = table.shape();
        info!(rows, cols, "loaded dataset");

        Ok(&*self.table.insert(table))
    }

    /// Borrow the loaded table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`] before a successful load.
    pub fn table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or(TableError::NotLoaded)
    }

    /// Mutably borrow the loaded table (for column cleaning).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`] before a successful load.
    pub fn table_mut(&mut self) -> Result<&mut Table> {
        self.table.as_mut().ok_or(TableError::NotLoaded)
    }

    /// Take ownership of the loaded table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`] before a successful load.
    pub fn into_table(self) -> Result<Table> {
        self.table.ok_or(TableError::NotLoaded)
    }

    /// Add `<column>_UTC`: the column's UNIX seconds rendered as
    /// `YYYY-MM-DD HH:MM:SS` in UTC. The source column is left unchanged and
    /// null cells stay null.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`], [`TableError::ColumnNotFound`], or
    /// [`TableError::InvalidTimestamp`] for a non-numeric cell.
    pub fn convert_unix_timestamp(&mut self, column: &str) -> Result<&Table> {
        let table = self.table.as_mut().ok_or(TableError::NotLoaded)?;
        let source = table.require_column(column)?;

        let rendered = source
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| match timestamp::parse_unix(value) {
                Ok(Some(dt)) => Ok(Value::Text(dt.format(UTC_FORMAT).to_string())),
                Ok(None) => Ok(Value::Null),
                Err(_) => Err(TableError::InvalidTimestamp {
                    column: column.to_string(),
                    row,
                    value: value.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        table.set_column(Column {
            name: format!("{column}_UTC"),
            values: rendered,
        })?;

        info!(column, "converted unix timestamps to UTC strings");
        Ok(&*table)
    }

    /// Summarize the loaded table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`] before a successful load.
    pub fn summary(&self) -> Result<DatasetSummary> {
        self.table().map(DatasetSummary::of)
    }

    /// Keep only the requested columns that exist, in the requested order.
    ///
    /// Missing names are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`] before a successful load.
    pub fn filter_columns<S: AsRef<str>>(&mut self, keep: &[S]) -> Result<&Table> {
        let table = self.table.as_mut().ok_or(TableError::NotLoaded)?;

        let (available, missing): (Vec<String>, Vec<String>) = keep
            .iter()
            .map(|s| s.as_ref().to_string())
            .partition(|name| table.has_column(name));

        if !missing.is_empty() {
            warn!(?missing, "columns not found in dataset");
        }

        table.retain_columns(&available);
        info!(kept = available.len(), "filtered dataset columns");
        Ok(&*table)
    }

    /// Write the loaded table to `output_path` (CSV or XLSX by extension).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotLoaded`], [`TableError::UnsupportedFormat`],
    /// or a write failure.
    pub fn save(&self, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        let table = self.table()?;
        io::write_table(table, output_path)?;
        info!(path = %output_path.display(), "saved processed data");
        Ok(())
    }
}

/// Convert a workbook's first sheet to CSV.
///
/// # Errors
///
/// Returns an error if either path has the wrong extension or any I/O fails.
pub fn xlsx_to_csv(xlsx_file: &Path, csv_file: &Path) -> Result<()> {
    if io::FileFormat::from_path(xlsx_file)? != io::FileFormat::Xlsx {
        return Err(TableError::UnsupportedFormat(xlsx_file.to_path_buf()));
    }
    if io::FileFormat::from_path(csv_file)? != io::FileFormat::Csv {
        return Err(TableError::UnsupportedFormat(csv_file.to_path_buf()));
    }
    let table = io::xlsx::read(xlsx_file)?;
    io::csv::write(&table, csv_file)?;
    info!(
        from = %xlsx_file.display(),
        to = %csv_file.display(),
        "converted workbook to csv"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
