//! Error types for the projection stage.

use afterglow_common::AfterglowError;
use numerics::NumericsError;
use thiserror::Error;

/// Result type alias using ObserverError.
pub type Result<T> = std::result::Result<T, ObserverError>;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Invalid observer parameters: {0}")]
    InvalidParams(String),

    #[error("Arrival time integration failed for sector {theta}, azimuth {phi}: {source}")]
    Arrival {
        phi: usize,
        theta: usize,
        #[source]
        source: NumericsError,
    },

    #[error("Time bins must be increasing and hold at least two edges")]
    InvalidBins,

    #[error(transparent)]
    Grid(#[from] AfterglowError),
}
