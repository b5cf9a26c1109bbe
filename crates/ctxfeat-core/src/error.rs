//! Error types for ctxfeat-core
//!
//! Provides a unified error type for the containers in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal layout details.

use thiserror::Error;

/// ctxfeat-core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero-sized or overflowing shape
    #[error("invalid shape: {0:?}")]
    InvalidShape(Vec<u32>),

    /// Coordinate outside the container shape
    #[error("index {coord:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { coord: Vec<u32>, shape: Vec<u32> },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for ctxfeat-core operations
pub type Result<T> = std::result::Result<T, Error>;
