//! Error types for numerical routines.

use thiserror::Error;

/// Result type alias using NumericsError.
pub type Result<T> = std::result::Result<T, NumericsError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericsError {
    #[error("Root not bracketed: f({lo}) = {f_lo}, f({hi}) = {f_hi}")]
    NoBracket {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("Bisection did not converge after {iterations} iterations (bracket [{lo}, {hi}])")]
    NonConvergence { iterations: usize, lo: f64, hi: f64 },

    #[error("Step size underflow at x = {x} (h = {h})")]
    StepSizeUnderflow { x: f64, h: f64 },

    #[error("Non-finite state at x = {x}")]
    NonFiniteState { x: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NumericsError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
