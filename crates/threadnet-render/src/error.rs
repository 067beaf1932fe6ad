use std::io;

use plotters::drawing::DrawingAreaErrorKind;
use threadnet_graph::GraphError;

/// Errors raised while rendering a figure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The output directory or image file could not be written.
    #[error("render I/O error: {0}")]
    Io(#[from] io::Error),

    /// The plotting backend failed (font lookup, encoding, ...).
    #[error("drawing error: {0}")]
    Drawing(String),

    /// A named option (layout, colour, metric) is not recognized.
    #[error("unknown {kind}: {value}")]
    UnknownOption {
        /// Which option family was being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Nothing to draw.
    #[error("nothing to plot: {0}")]
    EmptyInput(&'static str),

    /// A matrix row differs in length from the first row.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Failure while computing graph data for a figure.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl RenderError {
    /// Build a [`RenderError::UnknownOption`] for `kind` / `value`.
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownOption {
            kind,
            value: value.into(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(err.to_string())
    }
}

/// Convenience alias for rendering operations.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;
