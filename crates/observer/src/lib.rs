//! Observer-frame projection of shocked emission.
//!
//! An [`Observer`] fixes a viewing angle, builds the Doppler and arrival
//! time grids over the `(phi, theta, r)` cells, sorts the cells into an
//! equal-arrival-time surface and sums the boosted comoving intensity of
//! each cell into observed flux densities.

pub mod arrival;
pub mod eat;
pub mod emission;
pub mod error;
pub mod geometry;
pub mod observer;

pub use arrival::{arrival_time, integrate_arrival_times, ArrivalEqn, ArrivalTimes};
pub use eat::{EatSurface, SurfacePoint};
pub use emission::{ConstantEmission, EmissionSource};
pub use error::{ObserverError, Result};
pub use geometry::{cos_view, doppler, ObserverParams};
pub use observer::{observe_many, Observer};
