//! Per-sector integration drivers.

use crate::eqn::{BlastWaveEqn, ForwardShockEqn, EJECTA_SOUND_SPEED};
use crate::error::{DynamicsError, Result};
use crate::jump::{co_moving_b, e_thermal_down, n_down, relative_gamma};
use crate::shock::{CrossingLatch, SectorRows, ShockGrid, ShockPair};
use afterglow_common::con::{C2, MP};
use afterglow_common::{Coord, Jet, Medium, Microphysics};
use numerics::{sample_dense, DenseStepper, Tolerances};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, info, warn};

const FORWARD_RTOL: f64 = 1e-9;
const FORWARD_FIRST_STEP_DIVISOR: f64 = 1000.0;
const DUAL_RTOL: f64 = 1e-6;
const DUAL_FIRST_STEP_DIVISOR: f64 = 100.0;

/// Sectors whose initial Lorentz factor is this close to 1 carry no outflow.
const AT_REST_GAMMA: f64 = 1.0 + 1e-10;

/// Radius at which the swept-up rest mass reaches `1/Γ0` of the ejecta mass
/// for a uniform medium.
pub fn deceleration_radius(e_iso: f64, n: f64, gamma0: f64) -> f64 {
    (3.0 * e_iso / (4.0 * PI * n * MP * C2 * gamma0 * gamma0)).cbrt()
}

fn first_step(coord: &Coord, divisor: f64) -> f64 {
    (coord.r[0] - coord.r_b[0]) / divisor
}

fn has_outflow(jet: &dyn Jet, theta: f64) -> bool {
    jet.gamma0(theta) > AT_REST_GAMMA && jet.de_domega(theta, 0.0) > 0.0
}

/// Integrate the forward shock alone for every polar sector.
///
/// The downstream state follows the strong-shock jump; the shell width is
/// the Blandford-McKee comoving thickness `r / (12 Γ)`.
pub fn solve_forward_shock(
    coord: &Coord,
    jet: &dyn Jet,
    medium: &dyn Medium,
    micro: &Microphysics,
) -> Result<ShockGrid> {
    let (n_theta, n_r) = coord.shape();
    info!(sectors = n_theta, radii = n_r, "Solving forward shock");

    let sectors = (0..n_theta)
        .into_par_iter()
        .map(|j| solve_forward_sector(j, coord, jet, medium, micro))
        .collect::<Result<Vec<_>>>()?;

    Ok(ShockGrid::from_sectors(sectors)?)
}

fn solve_forward_sector(
    j: usize,
    coord: &Coord,
    jet: &dyn Jet,
    medium: &dyn Medium,
    micro: &Microphysics,
) -> Result<SectorRows> {
    let theta = coord.theta[j];
    let n_r = coord.r.len();
    if !has_outflow(jet, theta) {
        debug!(sector = j, theta = theta, "Sector carries no outflow");
        return Ok(SectorRows::at_rest(n_r));
    }

    let eqn = ForwardShockEqn::new(medium, jet, micro, theta, coord.sector_solid_angle(j));
    let mut stepper = DenseStepper::<4>::new(Tolerances::relative(FORWARD_RTOL));
    let states = stepper
        .initialize(
            &eqn,
            eqn.initial_state(coord.r_b[0]),
            coord.r_b[0],
            first_step(coord, FORWARD_FIRST_STEP_DIVISOR),
        )
        .and_then(|_| sample_dense(&mut stepper, &eqn, &coord.r))
        .map_err(|e| DynamicsError::sector(j, theta, e))?;

    let mut rows = SectorRows::with_capacity(n_r);
    for (&r, y) in coord.r.iter().zip(states.iter()) {
        let (gamma, u, t_eng, t_com) = (y[0], y[1], y[2], y[3]);
        let n_p = 4.0 * gamma * medium.number_density(r);
        let e_th = e_thermal_down(gamma, n_p);
        rows.push(
            gamma,
            u,
            co_moving_b(micro.eps_b, e_th),
            n_p,
            e_th,
            t_com,
            t_eng,
            r / (12.0 * gamma),
        );
    }

    let (steps, rejected) = stepper.stats();
    debug!(
        sector = j,
        theta = theta,
        gamma_final = rows.gamma[n_r - 1],
        steps = steps,
        rejected = rejected,
        "Forward shock sector solved"
    );
    Ok(rows)
}

/// Integrate forward and reverse shocks for every polar sector.
pub fn solve_shocks(
    coord: &Coord,
    jet: &dyn Jet,
    medium: &dyn Medium,
    micro: &Microphysics,
) -> Result<ShockPair> {
    let (n_theta, n_r) = coord.shape();
    info!(sectors = n_theta, radii = n_r, "Solving forward and reverse shocks");

    let sectors = (0..n_theta)
        .into_par_iter()
        .map(|j| solve_dual_sector(j, coord, jet, medium, micro))
        .collect::<Result<Vec<_>>>()?;

    let (forward, reverse): (Vec<_>, Vec<_>) = sectors.into_iter().unzip();
    let crossed = reverse.iter().filter(|r| r.crossing.is_some()).count();
    info!(
        sectors = n_theta,
        crossed = crossed,
        "Reverse shock crossing summary"
    );

    Ok(ShockPair {
        forward: ShockGrid::from_sectors(forward)?,
        reverse: ShockGrid::from_sectors(reverse)?,
    })
}

fn solve_dual_sector(
    j: usize,
    coord: &Coord,
    jet: &dyn Jet,
    medium: &dyn Medium,
    micro: &Microphysics,
) -> Result<(SectorRows, SectorRows)> {
    let theta = coord.theta[j];
    let n_r = coord.r.len();
    if !has_outflow(jet, theta) {
        debug!(sector = j, theta = theta, "Sector carries no outflow");
        return Ok((SectorRows::at_rest(n_r), SectorRows::at_rest(n_r)));
    }

    let eqn = BlastWaveEqn::new(medium, jet, micro, theta, coord.sector_solid_angle(j));
    let gamma0 = eqn.gamma0();
    let mut stepper = DenseStepper::<6>::new(Tolerances::relative(DUAL_RTOL));
    let states = stepper
        .initialize(
            &eqn,
            eqn.initial_state(coord.r_b[0]),
            coord.r_b[0],
            first_step(coord, DUAL_FIRST_STEP_DIVISOR),
        )
        .and_then(|_| sample_dense(&mut stepper, &eqn, &coord.r))
        .map_err(|e| DynamicsError::sector(j, theta, e))?;

    let mut forward = SectorRows::with_capacity(n_r);
    let mut reverse = SectorRows::with_capacity(n_r);
    let mut latch = CrossingLatch::new();

    for (k, (&r, y)) in coord.r.iter().zip(states.iter()).enumerate() {
        let (gamma, u, t_eng, t_com, d_rs, d_fs) = (y[0], y[1], y[2], y[3], y[4], y[5]);

        let n1 = medium.number_density(r);
        let n_fs = n_down(gamma, n1, medium.sound_speed());
        let e_fs = e_thermal_down(gamma, n_fs);
        forward.push(
            gamma,
            u,
            co_moving_b(micro.eps_b, e_fs),
            n_fs,
            e_fs,
            t_com,
            t_eng,
            r / (12.0 * gamma),
        );

        let (n_rs, e_rs, width_rs) = match latch.decayed(r, d_fs) {
            Some((n, e)) => (n, e, d_fs),
            None => {
                let n4 = eqn.ejecta_density(r, t_eng, d_fs);
                let gamma_rel = relative_gamma(gamma, gamma0);
                let n_rs = n_down(gamma_rel, n4, EJECTA_SOUND_SPEED);
                let e_rs = e_thermal_down(gamma_rel, n_rs);
                if latch.check(k, d_rs, d_fs, r, n_rs, e_rs) {
                    debug!(sector = j, index = k, r = r, "Reverse shock crossed the shell");
                }
                (n_rs, e_rs, d_rs)
            }
        };
        reverse.push(
            gamma,
            u,
            co_moving_b(micro.eps_b, e_rs),
            n_rs,
            e_rs,
            t_com,
            t_eng,
            width_rs,
        );
    }
    reverse.crossing = latch.crossing_index();

    if !latch.crossed() {
        warn!(sector = j, theta = theta, "Reverse shock never crossed the shell");
    }
    Ok((forward, reverse))
}
