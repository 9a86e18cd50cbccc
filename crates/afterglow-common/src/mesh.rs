//! Coordinate boundaries, cell centers and spacing helpers.

use crate::error::{AfterglowError, AfterglowResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Spherical coordinate grid of the emitting region.
///
/// Boundaries are strictly increasing; centers are the log-midpoints of the
/// radial boundaries and the arithmetic midpoints of the angular ones.
/// A `Coord` is immutable once built and is shared read-only by every stage
/// of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    pub r_b: Vec<f64>,
    pub theta_b: Vec<f64>,
    pub phi_b: Vec<f64>,
    pub r: Vec<f64>,
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
}

impl Coord {
    /// Build a grid from explicit boundary arrays.
    pub fn new(r_b: Vec<f64>, theta_b: Vec<f64>, phi_b: Vec<f64>) -> AfterglowResult<Self> {
        check_boundaries("r_b", &r_b)?;
        check_boundaries("theta_b", &theta_b)?;
        check_boundaries("phi_b", &phi_b)?;

        if r_b[0] <= 0.0 {
            return Err(AfterglowError::invalid_grid("r_b", "radii must be positive"));
        }
        if theta_b[0] < 0.0 || theta_b[theta_b.len() - 1] > PI {
            return Err(AfterglowError::invalid_grid(
                "theta_b",
                "polar angles must lie in [0, pi]",
            ));
        }

        let r = boundary_to_center_log(&r_b)?;
        let theta = boundary_to_center(&theta_b)?;
        let phi = boundary_to_center(&phi_b)?;

        Ok(Self {
            r_b,
            theta_b,
            phi_b,
            r,
            theta,
            phi,
        })
    }

    /// Log-spaced radii, linear polar angles from the axis, full azimuth.
    pub fn uniform(
        r_min: f64,
        r_max: f64,
        theta_max: f64,
        r_num: usize,
        theta_num: usize,
        phi_num: usize,
    ) -> AfterglowResult<Self> {
        Self::new(
            logspace(r_min, r_max, r_num + 1)?,
            linspace(0.0, theta_max, theta_num + 1)?,
            linspace(0.0, 2.0 * PI, phi_num + 1)?,
        )
    }

    /// Shape of the per-sector grids, `(theta, r)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.theta.len(), self.r.len())
    }

    /// Shape of the full grids, `(phi, theta, r)`.
    pub fn shape_3d(&self) -> (usize, usize, usize) {
        (self.phi.len(), self.theta.len(), self.r.len())
    }

    /// Solid angle of polar sector `j` over the whole azimuth.
    ///
    /// One jet, no bipolar factor. The dynamics engine and the observer both
    /// go through this convention.
    pub fn sector_solid_angle(&self, j: usize) -> f64 {
        2.0 * PI * (self.theta_b[j].cos() - self.theta_b[j + 1].cos()).abs()
    }

    /// Solid angle of cell `(i, j)`: `|d cos(theta)| * d phi`.
    pub fn cell_solid_angle(&self, i: usize, j: usize) -> f64 {
        let dcos = (self.theta_b[j].cos() - self.theta_b[j + 1].cos()).abs();
        let dphi = (self.phi_b[i + 1] - self.phi_b[i]).abs();
        dcos * dphi
    }
}

fn check_boundaries(name: &str, boundary: &[f64]) -> AfterglowResult<()> {
    if boundary.len() < 2 {
        return Err(AfterglowError::invalid_grid(
            name,
            format!("need at least 2 boundaries, got {}", boundary.len()),
        ));
    }
    if boundary.iter().any(|v| !v.is_finite()) {
        return Err(AfterglowError::invalid_grid(name, "boundaries must be finite"));
    }
    if boundary.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AfterglowError::invalid_grid(
            name,
            "boundaries must be strictly increasing",
        ));
    }
    Ok(())
}

/// `num` evenly spaced samples over `[start, end]`.
pub fn linspace(start: f64, end: f64, num: usize) -> AfterglowResult<Vec<f64>> {
    if num < 2 {
        return Err(AfterglowError::invalid_parameter(
            "num",
            format!("linspace needs at least 2 samples, got {}", num),
        ));
    }
    let step = (end - start) / (num - 1) as f64;
    let mut result: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
    result[num - 1] = end;
    Ok(result)
}

/// `num` geometrically spaced samples over `[start, end]`.
pub fn logspace(start: f64, end: f64, num: usize) -> AfterglowResult<Vec<f64>> {
    if num < 2 {
        return Err(AfterglowError::invalid_parameter(
            "num",
            format!("logspace needs at least 2 samples, got {}", num),
        ));
    }
    if start <= 0.0 || end <= 0.0 {
        return Err(AfterglowError::invalid_parameter(
            "start/end",
            format!("logspace bounds must be positive, got [{}, {}]", start, end),
        ));
    }
    let log_start = start.ln();
    let step = (end.ln() - log_start) / (num - 1) as f64;
    let mut result: Vec<f64> = (0..num)
        .map(|i| (log_start + i as f64 * step).exp())
        .collect();
    result[0] = start;
    result[num - 1] = end;
    Ok(result)
}

/// Arithmetic midpoints of consecutive boundaries.
pub fn boundary_to_center(boundary: &[f64]) -> AfterglowResult<Vec<f64>> {
    if boundary.len() < 2 {
        return Err(AfterglowError::invalid_grid(
            "boundary",
            "need at least 2 boundaries to form a cell",
        ));
    }
    Ok(boundary.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect())
}

/// Geometric midpoints of consecutive boundaries.
pub fn boundary_to_center_log(boundary: &[f64]) -> AfterglowResult<Vec<f64>> {
    if boundary.len() < 2 {
        return Err(AfterglowError::invalid_grid(
            "boundary",
            "need at least 2 boundaries to form a cell",
        ));
    }
    Ok(boundary.windows(2).map(|w| (w[0] * w[1]).sqrt()).collect())
}

/// Whether consecutive differences are constant within `tolerance` (relative).
pub fn is_linear_scale(arr: &[f64], tolerance: f64) -> bool {
    if arr.len() < 2 {
        return false;
    }
    let diff = arr[1] - arr[0];
    arr.windows(2)
        .skip(1)
        .all(|w| ((w[1] - w[0] - diff) / diff).abs() <= tolerance)
}

/// Whether consecutive ratios are constant within `tolerance` (relative).
pub fn is_log_scale(arr: &[f64], tolerance: f64) -> bool {
    if arr.len() < 2 {
        return false;
    }
    let ratio = arr[1] / arr[0];
    arr.windows(2)
        .skip(1)
        .all(|w| ((w[1] / w[0] - ratio) / ratio).abs() <= tolerance)
}

/// Polar boundaries over `[0, theta_max]` concentrated where the initial
/// Lorentz factor profile varies fastest.
///
/// The cell density follows `1 + min(|d ln(gamma0 - 1) / d theta| * theta_max, K)`
/// with `K = MAX_DENSITY_BOOST`. The cap keeps at least `1 / (1 + K)` of the
/// uniform density everywhere, so a sharp edge such as a top-hat boundary
/// cannot draw every cell into one sample.
pub fn adaptive_theta_space<F>(num: usize, gamma0: F, theta_max: f64) -> AfterglowResult<Vec<f64>>
where
    F: Fn(f64) -> f64,
{
    if theta_max <= 0.0 || theta_max > PI {
        return Err(AfterglowError::invalid_parameter(
            "theta_max",
            format!("must lie in (0, pi], got {}", theta_max),
        ));
    }
    const SAMPLES: usize = 2048;
    const MAX_DENSITY_BOOST: f64 = 4.0;
    let fine = linspace(0.0, theta_max, SAMPLES)?;
    let dtheta = fine[1] - fine[0];
    let log_excess = |theta: f64| (gamma0(theta) - 1.0).max(1e-12).ln();

    let density: Vec<f64> = fine
        .iter()
        .map(|&theta| {
            let lo = (theta - 0.5 * dtheta).max(0.0);
            let hi = (theta + 0.5 * dtheta).min(theta_max);
            let slope = (log_excess(hi) - log_excess(lo)) / (hi - lo);
            1.0 + (slope.abs() * theta_max).min(MAX_DENSITY_BOOST)
        })
        .collect();

    let mut cumulative = vec![0.0; SAMPLES];
    for i in 1..SAMPLES {
        cumulative[i] = cumulative[i - 1] + 0.5 * (density[i] + density[i - 1]) * dtheta;
    }
    let total = cumulative[SAMPLES - 1];

    let targets = linspace(0.0, total, num + 1)?;
    let mut boundary: Vec<f64> = targets
        .iter()
        .map(|&target| {
            let i = cumulative.partition_point(|&c| c < target).clamp(1, SAMPLES - 1);
            let (c0, c1) = (cumulative[i - 1], cumulative[i]);
            let frac = if c1 > c0 { (target - c0) / (c1 - c0) } else { 0.0 };
            fine[i - 1] + frac.clamp(0.0, 1.0) * dtheta
        })
        .collect();
    boundary[0] = 0.0;
    boundary[num] = theta_max;
    Ok(boundary)
}
