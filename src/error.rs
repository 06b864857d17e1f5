//! Error types for the lopdf-grid library

use thiserror::Error;

/// Result type alias using TableError
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur when building tables or assembling the document
#[derive(Debug, Error)]
pub enum TableError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// Writing the finished document failed
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The canvas cannot host a table (degenerate page geometry)
    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    /// Text could not be measured or painted
    #[error("Text rendering failed: {0}")]
    TextError(String),
}
