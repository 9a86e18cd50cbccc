//! Pipeline error type.

use afterglow_common::AfterglowError;
use blast_wave::DynamicsError;
use observer::ObserverError;
use synchrotron::SynchrotronError;
use thiserror::Error;

/// Result type alias using PipelineError.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(#[from] AfterglowError),

    #[error("Shock dynamics failed: {0}")]
    Dynamics(#[from] DynamicsError),

    #[error("Spectrum failed: {0}")]
    Spectrum(#[from] SynchrotronError),

    #[error("Projection failed: {0}")]
    Observer(#[from] ObserverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
