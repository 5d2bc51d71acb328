//! Error types for voigraph.

use thiserror::Error;

/// Result type alias for grapher operations.
pub type Result<T> = std::result::Result<T, GrapherError>;

#[derive(Error, Debug)]
pub enum GrapherError {
    /// Image or object map absent before statistics computation.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// ROI averaging failed.
    #[error("cannot create roi: {0}")]
    Computation(String),

    /// Two parallel axes disagree in length.
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A table was readable but its contents are not a VOI table.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("GUI error: {0}")]
    Gui(String),
}
