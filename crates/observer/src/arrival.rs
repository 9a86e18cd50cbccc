//! Observed arrival times of photons emitted by each cell.

use afterglow_common::con::{gamma_to_beta, C};
use afterglow_common::{Coord, MeshGrid};
use nalgebra::SVector;
use numerics::{interpolate, sample_dense, DenseStepper, Extrapolation, OdeSystem, Scale, Tolerances};

const ARRIVAL_RTOL: f64 = 1e-9;
const FIRST_STEP_DIVISOR: f64 = 1000.0;
const BETA_FLOOR: f64 = 1e-12;

/// Source of the engine-frame time at each cell.
#[derive(Debug, Clone, Copy)]
pub enum ArrivalTimes<'a> {
    /// Engine times already integrated alongside the shock.
    Engine(&'a MeshGrid<f64>),
    /// Integrate `dt/dr` along each ray from the Lorentz factor profile.
    Integrated,
}

/// Observed arrival time of a photon emitted at radius `r` and engine time
/// `t_eng` in direction `cos_chi` from the line of sight.
pub fn arrival_time(t_eng: f64, r: f64, cos_chi: f64, z: f64) -> f64 {
    (t_eng + (1.0 - cos_chi) * r / C) * (1.0 + z)
}

/// `dt/dr = (1 - β cos χ) / (β c)` with `Γ(r)` interpolated from one sector.
pub struct ArrivalEqn<'a> {
    r: &'a [f64],
    gamma: &'a [f64],
    cos_chi: f64,
}

impl<'a> ArrivalEqn<'a> {
    pub fn new(r: &'a [f64], gamma: &'a [f64], cos_chi: f64) -> Self {
        Self { r, gamma, cos_chi }
    }

    fn beta(&self, r: f64) -> f64 {
        let gamma = interpolate(r, self.r, self.gamma, Scale::Log, Extrapolation::Clamp).max(1.0);
        gamma_to_beta(gamma).max(BETA_FLOOR)
    }
}

impl OdeSystem<1> for ArrivalEqn<'_> {
    fn rhs(&self, r: f64, _t: &SVector<f64, 1>) -> SVector<f64, 1> {
        let beta = self.beta(r);
        SVector::from([(1.0 - beta * self.cos_chi) / (beta * C)])
    }
}

/// Arrival times along one ray, integrated from the innermost cell center.
///
/// The ray starts coasting at `Γ[0]`, so the first time is the light-travel
/// lag of a shell launched at the origin. Cells at rest never deliver
/// photons and get an infinite arrival time.
pub fn integrate_arrival_times(
    coord: &Coord,
    gamma: &[f64],
    cos_chi: f64,
    z: f64,
) -> numerics::Result<Vec<f64>> {
    let n_r = coord.r.len();
    if gamma.first().map_or(true, |&g| g <= 1.0) {
        return Ok(vec![f64::INFINITY; n_r]);
    }

    let eqn = ArrivalEqn::new(&coord.r, gamma, cos_chi);
    let r0 = coord.r[0];
    let beta0 = gamma_to_beta(gamma[0]);
    let t0 = r0 * (1.0 - beta0 * cos_chi) / (C * beta0);

    let mut stepper = DenseStepper::<1>::new(Tolerances::new(0.0, ARRIVAL_RTOL));
    let h0 = (coord.r_b[1] - coord.r_b[0]) / FIRST_STEP_DIVISOR;
    stepper.initialize(&eqn, SVector::from([t0]), r0, h0)?;
    let states = sample_dense(&mut stepper, &eqn, &coord.r)?;

    Ok(states
        .iter()
        .zip(gamma)
        .map(|(t, &g)| if g > 1.0 { t[0] * (1.0 + z) } else { f64::INFINITY })
        .collect())
}
