//! Projection of a shock grid onto one viewing direction.

use crate::arrival::{arrival_time, integrate_arrival_times, ArrivalTimes};
use crate::eat::EatSurface;
use crate::emission::EmissionSource;
use crate::error::{ObserverError, Result};
use crate::geometry::{cos_view, doppler, ObserverParams};
use afterglow_common::{
    boundary_to_center_log, create_3d_grid, create_3d_grid_like, create_grid_like,
    AfterglowError, Coord, MeshGrid, MeshGrid3,
};
use numerics::{interpolate, Extrapolation, Scale};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, info};

/// Doppler factors, arrival times and emitting areas of every
/// `(phi, theta, r)` cell as seen from one direction.
#[derive(Debug, Clone)]
pub struct Observer {
    pub params: ObserverParams,
    pub doppler: MeshGrid3<f64>,
    pub t_obs: MeshGrid3<f64>,
    /// `r² dΩ` of each cell, cm².
    pub area: MeshGrid3<f64>,
    /// Cells whose shell moves at all; cells at rest are never summed.
    moving: MeshGrid<bool>,
    eat: EatSurface,
}

impl Observer {
    /// Project the `(theta, r)` Lorentz factor grid for one observer.
    pub fn observe(
        coord: &Coord,
        gamma: &MeshGrid<f64>,
        times: ArrivalTimes<'_>,
        params: ObserverParams,
    ) -> Result<Self> {
        params.validate().map_err(ObserverError::InvalidParams)?;
        check_shape(coord, gamma)?;
        if let ArrivalTimes::Engine(t_eng) = times {
            check_shape(coord, t_eng)?;
        }

        let (n_phi, n_theta, n_r) = coord.shape_3d();
        info!(
            theta_obs = params.theta_obs,
            cells = n_phi * n_theta * n_r,
            integrated = matches!(times, ArrivalTimes::Integrated),
            "Projecting onto observer"
        );

        let columns = (0..n_phi * n_theta)
            .into_par_iter()
            .map(|n| -> Result<(Vec<f64>, Vec<f64>)> {
                let (i, j) = (n / n_theta, n % n_theta);
                let cos_chi = cos_view(coord.theta[j], coord.phi[i], params.theta_obs);
                let row = gamma.row(j);
                let dop: Vec<f64> = row.iter().map(|&g| doppler(g, cos_chi)).collect();
                let t: Vec<f64> = match times {
                    ArrivalTimes::Engine(t_eng) => t_eng
                        .row(j)
                        .iter()
                        .zip(&coord.r)
                        .map(|(&te, &r)| arrival_time(te, r, cos_chi, params.z))
                        .collect(),
                    ArrivalTimes::Integrated => {
                        integrate_arrival_times(coord, row, cos_chi, params.z).map_err(|source| {
                            ObserverError::Arrival {
                                phi: i,
                                theta: j,
                                source,
                            }
                        })?
                    }
                };
                Ok((dop, t))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut doppler_grid = create_3d_grid(n_phi, n_theta, n_r, 1.0);
        let mut t_obs = create_3d_grid(n_phi, n_theta, n_r, f64::INFINITY);
        let mut area = create_3d_grid_like(&t_obs, 0.0);
        for (n, (dop, t)) in columns.into_iter().enumerate() {
            let (i, j) = (n / n_theta, n % n_theta);
            doppler_grid.row_mut(i, j).copy_from_slice(&dop);
            t_obs.row_mut(i, j).copy_from_slice(&t);
            let d_omega = coord.cell_solid_angle(i, j);
            for (a, &r) in area.row_mut(i, j).iter_mut().zip(&coord.r) {
                *a = r * r * d_omega;
            }
        }

        let mut moving = create_grid_like(gamma, false);
        for (flag, &g) in moving.as_mut_slice().iter_mut().zip(gamma.as_slice()) {
            *flag = g > 1.0;
        }
        let eat = EatSurface::from_grid(&t_obs);
        debug!(t_span = ?eat.finite_span(), "Equal-arrival-time surface sorted");

        Ok(Self {
            params,
            doppler: doppler_grid,
            t_obs,
            area,
            moving,
            eat,
        })
    }

    pub fn eat_surface(&self) -> &EatSurface {
        &self.eat
    }

    /// Observed flux density contributed by one cell at observed frequency
    /// `nu_obs`, before division by any time interval.
    fn cell_flux(
        &self,
        (i, j, k): (usize, usize, usize),
        nu_obs: f64,
        emission: &dyn EmissionSource,
    ) -> f64 {
        if !self.moving[(j, k)] || !self.t_obs[(i, j, k)].is_finite() {
            return 0.0;
        }
        let z1 = 1.0 + self.params.z;
        let d = self.doppler[(i, j, k)];
        let nu_com = nu_obs * z1 / d;
        let d_l = self.params.lumi_dist;
        d * d * d * emission.intensity(j, k, nu_com) * self.area[(i, j, k)]
            / (4.0 * PI * d_l * d_l * z1)
    }

    /// Flux density averaged over each observed time bin.
    ///
    /// `t_bins` are bin edges; cells are located in the sorted surface by
    /// binary search and each bin's sum is divided by its width.
    pub fn flux_binned(
        &self,
        t_bins: &[f64],
        nu_obs: f64,
        emission: &dyn EmissionSource,
    ) -> Result<Vec<f64>> {
        if t_bins.len() < 2 || t_bins.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(ObserverError::InvalidBins);
        }
        Ok(t_bins
            .windows(2)
            .map(|w| {
                let sum: f64 = self
                    .eat
                    .window(w[0], w[1])
                    .iter()
                    .map(|p| self.cell_flux(p.index, nu_obs, emission))
                    .sum();
                sum / (w[1] - w[0])
            })
            .collect())
    }

    /// Flux density at arbitrary observed times.
    ///
    /// Each `(phi, theta)` column is a light curve sampled at the arrival
    /// times of its cells; it is interpolated log-log to `t` and
    /// extrapolated as a power law on both sides.
    pub fn light_curve(&self, t: &[f64], nu_obs: f64, emission: &dyn EmissionSource) -> Vec<f64> {
        let (n_phi, n_theta, _) = self.t_obs.shape();
        (0..n_phi * n_theta)
            .into_par_iter()
            .map(|n| {
                let (i, j) = (n / n_theta, n % n_theta);
                let (times, flux): (Vec<f64>, Vec<f64>) = self
                    .t_obs
                    .row(i, j)
                    .iter()
                    .enumerate()
                    .filter(|&(k, &tk)| tk.is_finite() && self.moving[(j, k)])
                    .map(|(k, &tk)| (tk, self.cell_flux((i, j, k), nu_obs, emission)))
                    .unzip();
                if times.len() < 2 {
                    return vec![0.0; t.len()];
                }
                t.iter()
                    .map(|&ti| interpolate(ti, &times, &flux, Scale::Log, Extrapolation::Both))
                    .collect::<Vec<f64>>()
            })
            .reduce(
                || vec![0.0; t.len()],
                |mut acc, column| {
                    acc.iter_mut().zip(column).for_each(|(a, c)| *a += c);
                    acc
                },
            )
    }

    /// Flux integrated over the frequency band with edges `nu_bounds`,
    /// evaluated at the log-center of each sub-band.
    pub fn band_flux(
        &self,
        t: &[f64],
        nu_bounds: &[f64],
        emission: &dyn EmissionSource,
    ) -> Result<Vec<f64>> {
        let centers = boundary_to_center_log(nu_bounds)?;
        let mut total = vec![0.0; t.len()];
        for (b, &nu) in centers.iter().enumerate() {
            let width = nu_bounds[b + 1] - nu_bounds[b];
            for (acc, f) in total.iter_mut().zip(self.light_curve(t, nu, emission)) {
                *acc += f * width;
            }
        }
        Ok(total)
    }
}

/// One [`Observer`] per parameter set over the same shock grid.
pub fn observe_many(
    coord: &Coord,
    gamma: &MeshGrid<f64>,
    times: ArrivalTimes<'_>,
    params: &[ObserverParams],
) -> Result<Vec<Observer>> {
    params
        .par_iter()
        .map(|&p| Observer::observe(coord, gamma, times, p))
        .collect()
}

fn check_shape(coord: &Coord, grid: &MeshGrid<f64>) -> Result<()> {
    let (rows, cols) = coord.shape();
    if grid.shape() != (rows, cols) {
        let (gr, gc) = grid.shape();
        return Err(AfterglowError::ShapeMismatch {
            expected: vec![rows, cols],
            actual: vec![gr, gc],
        }
        .into());
    }
    Ok(())
}
