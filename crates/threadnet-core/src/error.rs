use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while loading, transforming, or saving a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The file extension is neither `.csv` nor `.xlsx`.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An operation needs a table but `load()` has not succeeded yet.
    #[error("data not loaded; call load() first")]
    NotLoaded,

    /// A column required by the operation is absent.
    #[error("column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A named option (cleaning method, window, metric, ...) is not recognized.
    #[error("unknown {kind}: {value}")]
    UnknownOption {
        /// Which option family was being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A timestamp cell could not be interpreted.
    #[error("invalid timestamp in column '{column}' at row {row}: {value}")]
    InvalidTimestamp {
        /// Column holding the timestamp.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// Rendered cell value.
        value: String,
    },

    /// Columns passed to [`crate::table::Table::from_columns`] differ in length.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        /// Offending column.
        column: String,
        /// Row count of the first column.
        expected: usize,
        /// Row count of the offending column.
        actual: usize,
    },

    /// The workbook has no worksheet to read.
    #[error("workbook {} has no worksheet", .0.display())]
    EmptyWorkbook(PathBuf),

    /// Filesystem failure.
    #[error("table I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reader/writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX reader failure.
    #[error("xlsx read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// XLSX writer failure.
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
}

impl TableError {
    /// Build an [`TableError::UnknownOption`] for `kind` / `value`.
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The file is not valid TOML for [`crate::config::AnalysisConfig`].
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Convenience alias for table operations.
pub type Result<T, E = TableError> = std::result::Result<T, E>;
