//! One-shot afterglow computation.
//!
//! [`run`] takes a [`PipelineConfig`] through the three stages in order:
//! shock dynamics over the `(theta, r)` grid, synchrotron spectra of each
//! shocked cell, and projection onto the configured observer. Each stage
//! only reads the grids of the previous one.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{
    GridConfig, JetConfig, JetProfile, LightCurveConfig, LightCurveMethod, MediumConfig,
    PipelineConfig,
};
pub use error::{PipelineError, Result};
pub use pipeline::{
    build_coord, compute_band_curves, compute_light_curves, compute_spectra, run, solve_dynamics,
    BandCurve, Dynamics, LightCurve, PipelineOutput, Spectra, ViewCurves,
};
