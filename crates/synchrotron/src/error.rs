//! Error types for spectral computations.

use afterglow_common::AfterglowError;
use numerics::NumericsError;
use thiserror::Error;

/// Result type alias using SynchrotronError.
pub type Result<T> = std::result::Result<T, SynchrotronError>;

#[derive(Debug, Error)]
pub enum SynchrotronError {
    #[error("Failed to solve for {quantity}: {source}")]
    RootSolve {
        quantity: &'static str,
        #[source]
        source: NumericsError,
    },

    #[error("No regime matches breaks gamma_a = {gamma_a}, gamma_c = {gamma_c}, gamma_m = {gamma_m}")]
    UnorderedBreaks {
        gamma_a: f64,
        gamma_c: f64,
        gamma_m: f64,
    },

    #[error(transparent)]
    Grid(#[from] AfterglowError),

    #[error("Cell ({theta}, {r}): {source}")]
    Cell {
        theta: usize,
        r: usize,
        #[source]
        source: Box<SynchrotronError>,
    },
}

impl SynchrotronError {
    pub fn root_solve(quantity: &'static str, source: NumericsError) -> Self {
        Self::RootSolve { quantity, source }
    }

    /// Attach the grid cell at which the error occurred.
    pub fn at_cell(self, theta: usize, r: usize) -> Self {
        Self::Cell {
            theta,
            r,
            source: Box::new(self),
        }
    }
}
