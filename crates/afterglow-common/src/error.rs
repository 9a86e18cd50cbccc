//! Error types shared by the afterglow crates.

use thiserror::Error;

/// Result type alias using AfterglowError.
pub type AfterglowResult<T> = Result<T, AfterglowError>;

/// Precondition violations detected while building grids or collaborators.
#[derive(Debug, Error)]
pub enum AfterglowError {
    #[error("Invalid grid '{name}': {message}")]
    InvalidGrid { name: String, message: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Grid shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

impl AfterglowError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}
