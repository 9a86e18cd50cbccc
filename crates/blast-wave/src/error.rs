//! Error types for the dynamics engine.

use afterglow_common::AfterglowError;
use numerics::NumericsError;
use thiserror::Error;

/// Result type alias using DynamicsError.
pub type Result<T> = std::result::Result<T, DynamicsError>;

#[derive(Debug, Error)]
pub enum DynamicsError {
    #[error("Sector {sector} (theta = {theta}) failed: {source}")]
    Sector {
        sector: usize,
        theta: f64,
        #[source]
        source: NumericsError,
    },

    #[error("Invalid input: {0}")]
    Input(#[from] AfterglowError),
}

impl DynamicsError {
    pub fn sector(sector: usize, theta: f64, source: NumericsError) -> Self {
        Self::Sector {
            sector,
            theta,
            source,
        }
    }
}
