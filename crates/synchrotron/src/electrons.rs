//! Electron distributions behind a shock.

use crate::breaks::{
    gamma_absorb, gamma_bar, gamma_cool, gamma_max, gamma_min, gamma_n_peak, syn_p_nu_peak,
};
use crate::error::{Result, SynchrotronError};
use crate::inverse_compton::{thomson_y, InverseCompton, IC_TOLERANCE, MAX_IC_ITERATIONS};
use crate::regime::Regime;
use afterglow_common::{MeshGrid, Microphysics};
use blast_wave::{adiabatic_index, ShockGrid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

/// Downstream state of one shock cell, as read off a [`ShockGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockCell {
    pub gamma: f64,
    pub b: f64,
    pub n_p: f64,
    pub t_com: f64,
    pub width: f64,
}

impl ShockCell {
    pub fn from_grid(shock: &ShockGrid, j: usize, k: usize) -> Self {
        Self {
            gamma: shock.gamma[(j, k)],
            b: shock.b[(j, k)],
            n_p: shock.n_p[(j, k)],
            t_com: shock.t_com[(j, k)],
            width: shock.width[(j, k)],
        }
    }

    /// Whether the cell holds shocked, magnetized plasma at all.
    pub fn is_emitting(&self) -> bool {
        self.gamma > 1.0 && self.b > 0.0 && self.n_p > 0.0 && self.width > 0.0 && self.t_com > 0.0
    }
}

/// Power-law electron population of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynElectrons {
    /// Injection Lorentz factor.
    pub gamma_m: f64,
    /// Cooling Lorentz factor.
    pub gamma_c: f64,
    /// Self-absorption Lorentz factor.
    pub gamma_a: f64,
    /// Maximum Lorentz factor.
    pub gamma_max: f64,
    /// Lorentz factor at which `γ N(γ)` peaks.
    pub gamma_n_peak: f64,
    pub p: f64,
    /// Electron number density, cm^-3.
    pub n_tot: f64,
    /// Electron column through the shocked width, cm^-2.
    pub column: f64,
    /// Peak comoving specific intensity of the emitted photons.
    pub i_nu_peak: f64,
    /// Compton parameter used for cooling.
    pub y: f64,
    pub regime: Regime,
}

impl SynElectrons {
    /// A cell with no shocked electrons.
    pub fn dark(p: f64) -> Self {
        Self {
            gamma_m: 1.0,
            gamma_c: 1.0,
            gamma_a: 1.0,
            gamma_max: 1.0,
            gamma_n_peak: 1.0,
            p,
            n_tot: 0.0,
            column: 0.0,
            i_nu_peak: 0.0,
            y: 0.0,
            regime: Regime::Amc,
        }
    }

    /// Electrons of one shock cell.
    pub fn from_cell(cell: &ShockCell, micro: &Microphysics, ic: InverseCompton) -> Result<Self> {
        if !cell.is_emitting() {
            return Ok(Self::dark(micro.p));
        }
        let p = micro.p;
        let n_tot = cell.n_p * micro.xi;
        let column = n_tot * cell.width;
        let i_nu_peak = syn_p_nu_peak(cell.b, p) * column / (4.0 * PI);
        let mean = gamma_bar(cell.gamma, micro.eps_e, micro.xi);

        let breaks = |y: f64| -> Result<(f64, f64, f64)> {
            let g_max = gamma_max(cell.b, micro.zeta, y);
            let g_m = gamma_min(mean, g_max, p)?;
            let g_c = gamma_cool(cell.t_com, cell.b, y);
            Ok((g_max, g_m, g_c))
        };

        let (y, (g_max, g_m, g_c)) = match ic {
            InverseCompton::None => (0.0, breaks(0.0)?),
            InverseCompton::Fixed(y) => (y, breaks(y)?),
            InverseCompton::SelfConsistent => {
                let mut y = 0.0;
                let mut current = breaks(y)?;
                for _ in 0..MAX_IC_ITERATIONS {
                    let next = thomson_y(micro.eps_e, micro.eps_b, current.1, current.2, p);
                    current = breaks(next)?;
                    let settled = (next - y).abs() <= IC_TOLERANCE * next.max(IC_TOLERANCE);
                    y = next;
                    if settled {
                        break;
                    }
                }
                (y, current)
            }
        };

        let g_a = gamma_absorb(adiabatic_index(cell.gamma), cell.b, i_nu_peak, g_m, g_c, g_max)?;
        let regime = Regime::classify(g_a, g_c, g_m).ok_or(SynchrotronError::UnorderedBreaks {
            gamma_a: g_a,
            gamma_c: g_c,
            gamma_m: g_m,
        })?;

        Ok(Self {
            gamma_m: g_m,
            gamma_c: g_c,
            gamma_a: g_a,
            gamma_max: g_max,
            gamma_n_peak: gamma_n_peak(g_a, g_c, g_m),
            p,
            n_tot,
            column,
            i_nu_peak,
            y,
            regime,
        })
    }

    /// Electron number density per unit Lorentz factor.
    pub fn n(&self, gamma: f64) -> f64 {
        if self.n_tot == 0.0 {
            return 0.0;
        }
        self.n_tot * self.spectrum(gamma)
    }

    /// Shape of the number spectrum, continuous across every internal
    /// break and cut off exponentially above `γ_M`.
    ///
    /// For slow cooling it is normalized to unit integral below `γ_c`.
    /// Below the lowest populated break (`γ_m` for slow cooling without
    /// strong absorption, `γ_c` for fast cooling) the shape is zero.
    pub fn spectrum(&self, gamma: f64) -> f64 {
        let (a, c, m, p) = (self.gamma_a, self.gamma_c, self.gamma_m, self.p);
        let injected = |g: f64| (p - 1.0) / m * (g / m).powf(-p);
        let cooled = |g: f64| c / (g * g);

        let body = match self.regime {
            Regime::Amc | Regime::Mac => {
                if gamma < m {
                    0.0
                } else if gamma <= c {
                    injected(gamma)
                } else {
                    injected(gamma) * c / gamma
                }
            }
            Regime::Acm => {
                if gamma < c {
                    0.0
                } else if gamma <= m {
                    cooled(gamma)
                } else {
                    cooled(gamma) * (gamma / m).powf(1.0 - p)
                }
            }
            Regime::Cam => {
                if gamma <= a {
                    cooled(a) * (gamma / a).powi(2)
                } else if gamma <= m {
                    cooled(gamma)
                } else {
                    cooled(gamma) * (gamma / m).powf(1.0 - p)
                }
            }
            Regime::Mca => {
                let above = |g: f64| injected(g) * c / g;
                if gamma <= a {
                    above(a) * (gamma / a).powi(2)
                } else {
                    above(gamma)
                }
            }
            Regime::Cma => {
                let above = |g: f64| cooled(g) * (g / m).powf(1.0 - p);
                if gamma <= a {
                    above(a) * (gamma / a).powi(2)
                } else {
                    above(gamma)
                }
            }
        };
        body * (-gamma / self.gamma_max).exp()
    }
}

/// Electron populations for every cell of a shock grid.
pub fn gen_syn_electrons(
    shock: &ShockGrid,
    micro: &Microphysics,
    ic: InverseCompton,
) -> Result<MeshGrid<SynElectrons>> {
    let (n_theta, n_r) = shock.shape();
    info!(sectors = n_theta, radii = n_r, inverse_compton = ?ic, "Generating electron populations");

    let rows = (0..n_theta)
        .into_par_iter()
        .map(|j| {
            (0..n_r)
                .map(|k| {
                    SynElectrons::from_cell(&ShockCell::from_grid(shock, j, k), micro, ic)
                        .map_err(|e| e.at_cell(j, k))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let grid = MeshGrid::from_rows(rows)?;
    debug!(
        fast_cooling = grid.as_slice().iter().filter(|e| e.regime.is_fast_cooling()).count(),
        "Electron populations ready"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn electrons(breaks: (f64, f64, f64), p: f64) -> SynElectrons {
        let (a, c, m) = breaks;
        SynElectrons {
            gamma_m: m,
            gamma_c: c,
            gamma_a: a,
            gamma_max: 1e12,
            gamma_n_peak: gamma_n_peak(a, c, m),
            p,
            n_tot: 1.0,
            column: 1.0,
            i_nu_peak: 1.0,
            y: 0.0,
            regime: Regime::classify(a, c, m).unwrap(),
        }
    }

    #[test]
    fn test_slow_cooling_normalized_below_cooling() {
        let e = electrons((10.0, 1e9, 1e3), 2.5);
        // ∫_m^c (p-1)/m (γ/m)^-p dγ ≈ 1 for c >> m
        let n = 20_000;
        let (lo, hi) = (1e3f64.ln(), 1e9f64.ln());
        let dx = (hi - lo) / n as f64;
        let integral: f64 = (0..n)
            .map(|i| {
                let g = (lo + (i as f64 + 0.5) * dx).exp();
                e.spectrum(g) * g * dx
            })
            .sum();
        assert!((integral - 1.0).abs() < 1e-2, "integral = {}", integral);
    }

    #[test]
    fn test_zero_below_support() {
        let slow = electrons((10.0, 1e5, 1e3), 2.3);
        assert_eq!(slow.spectrum(500.0), 0.0);
        let fast = electrons((10.0, 1e3, 1e5), 2.3);
        assert_eq!(fast.spectrum(500.0), 0.0);
    }

    #[test]
    fn test_dark_cell() {
        let cell = ShockCell {
            gamma: 1.0,
            b: 0.0,
            n_p: 0.0,
            t_com: 0.0,
            width: 0.0,
        };
        let e = SynElectrons::from_cell(&cell, &Microphysics::default(), InverseCompton::None)
            .unwrap();
        assert_eq!(e.i_nu_peak, 0.0);
        assert_eq!(e.n(100.0), 0.0);
    }

    fn bm_cell() -> ShockCell {
        ShockCell {
            gamma: 50.0,
            b: 1.0,
            n_p: 200.0,
            t_com: 1e5,
            width: 1e15,
        }
    }

    #[test]
    fn test_cell_breaks_are_physical() {
        let e = SynElectrons::from_cell(&bm_cell(), &Microphysics::default(), InverseCompton::None)
            .unwrap();
        assert!(e.gamma_m > 1.0 && e.gamma_c > 1.0 && e.gamma_a >= 1.0);
        assert!(e.gamma_max > e.gamma_m);
        assert_eq!(Regime::classify(e.gamma_a, e.gamma_c, e.gamma_m), Some(e.regime));
    }

    #[test]
    fn test_compton_cooling_lowers_gamma_c() {
        let micro = Microphysics::default();
        let plain = SynElectrons::from_cell(&bm_cell(), &micro, InverseCompton::None).unwrap();
        let fixed = SynElectrons::from_cell(&bm_cell(), &micro, InverseCompton::Fixed(3.0)).unwrap();
        let sc = SynElectrons::from_cell(&bm_cell(), &micro, InverseCompton::SelfConsistent).unwrap();
        assert!(fixed.gamma_c < plain.gamma_c);
        assert!(sc.y > 0.0);
        let y = thomson_y(micro.eps_e, micro.eps_b, sc.gamma_m, sc.gamma_c, micro.p);
        assert!((y / sc.y - 1.0).abs() < 1e-4);
    }
}
