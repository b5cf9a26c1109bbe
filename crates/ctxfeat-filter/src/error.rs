//! Error types for ctxfeat-filter

use thiserror::Error;

/// Errors that can occur while building context features
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ctxfeat_core::Error),

    /// Radii violating the ascending, non-empty contract
    #[error("invalid radii: {0}")]
    InvalidRadii(String),

    /// Output or table shape that doesn't match the input field
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Required shape
        expected: Vec<u32>,
        /// Shape that was supplied
        actual: Vec<u32>,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
