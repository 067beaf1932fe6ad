/// Errors raised by graph construction and graph metrics.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A column named by the caller is absent from the table.
    #[error("column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A weight cell is neither numeric nor null.
    #[error("non-numeric weight in column '{column}' at row {row}: {value}")]
    NonNumericWeight {
        /// Weight column.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// Rendered cell value.
        value: String,
    },

    /// A timestamp cell could not be interpreted.
    #[error("invalid timestamp in column '{column}' at row {row}: {value}")]
    InvalidTimestamp {
        /// Time column.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// Rendered cell value.
        value: String,
    },

    /// A named option (window, metric, community method) is not recognized.
    #[error("unknown {kind}: {value}")]
    UnknownOption {
        /// Which option family was being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The metric is undefined on a graph without nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Eigenvector power iteration did not converge.
    #[error("eigenvector centrality did not converge in {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },
}

impl GraphError {
    /// Build a [`GraphError::UnknownOption`] for `kind` / `value`.
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }
}

/// Convenience alias for graph operations.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
