//! Numerical building blocks for the afterglow pipeline.
//!
//! - [`interpolation`]: piecewise-linear lookup in linear or log-log space
//!   with configurable behaviour outside the tabulated span
//! - [`root`]: bracketed bisection
//! - [`ode`]: Dormand–Prince 5(4) stepper with continuous (dense) output

pub mod error;
pub mod interpolation;
pub mod ode;
pub mod root;

pub use error::{NumericsError, Result};
pub use interpolation::{
    interp, interp_extra_both, interp_extra_hi, interp_extra_lo, interp_log,
    interp_log_extra_both, interp_log_extra_hi, interp_log_extra_lo, interpolate, Extrapolation,
    Interpolator, Scale,
};
pub use ode::{sample_dense, DenseStepper, OdeSystem, Tolerances};
pub use root::{root_bisection, DEFAULT_BISECTION_TOL, MAX_BISECTION_ITERATIONS};
