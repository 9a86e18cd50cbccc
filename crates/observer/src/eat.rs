//! Equal-arrival-time surface: every cell ordered by when its light arrives.

use afterglow_common::MeshGrid3;

/// One cell on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub t_obs: f64,
    /// `(phi, theta, r)` cell index.
    pub index: (usize, usize, usize),
}

/// Cells sorted by ascending arrival time. Cells that never deliver
/// photons carry infinite times and sort to the end.
#[derive(Debug, Clone, Default)]
pub struct EatSurface {
    points: Vec<SurfacePoint>,
}

impl EatSurface {
    pub fn from_grid(t_obs: &MeshGrid3<f64>) -> Self {
        let (n_phi, n_theta, n_r) = t_obs.shape();
        let mut points = Vec::with_capacity(n_phi * n_theta * n_r);
        for i in 0..n_phi {
            for j in 0..n_theta {
                for (k, &t) in t_obs.row(i, j).iter().enumerate() {
                    points.push(SurfacePoint {
                        t_obs: t,
                        index: (i, j, k),
                    });
                }
            }
        }
        points.sort_by(|a, b| a.t_obs.total_cmp(&b.t_obs).then(a.index.cmp(&b.index)));
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    /// Cells arriving in `[t_lo, t_hi)`.
    pub fn window(&self, t_lo: f64, t_hi: f64) -> &[SurfacePoint] {
        let lo = self.points.partition_point(|p| p.t_obs < t_lo);
        let hi = self.points.partition_point(|p| p.t_obs < t_hi);
        &self.points[lo..hi.max(lo)]
    }

    /// Earliest and latest finite arrival times.
    pub fn finite_span(&self) -> Option<(f64, f64)> {
        let first = self.points.first().filter(|p| p.t_obs.is_finite())?;
        let last = self.points.iter().rev().find(|p| p.t_obs.is_finite())?;
        Some((first.t_obs, last.t_obs))
    }
}
