//! Error types for the embedded-window library.

use thiserror::Error;

/// Result type alias for windowing operations.
pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors that can occur during windowing, streaming, or rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The number of feature axes has not been bound by a fit yet.
    #[error("spec must be fitted before use")]
    FitRequired,
}
