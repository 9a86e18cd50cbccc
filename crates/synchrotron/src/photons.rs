//! Synchrotron photon spectra.

use crate::breaks::{nu_e_peak, syn_nu};
use crate::electrons::SynElectrons;
use crate::error::Result;
use crate::regime::Regime;
use afterglow_common::{AfterglowError, MeshGrid};
use blast_wave::ShockGrid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Comoving photon spectrum of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynPhotons {
    pub nu_m: f64,
    pub nu_c: f64,
    pub nu_a: f64,
    pub nu_max: f64,
    /// Frequency at which `ν I_ν` peaks.
    pub nu_e_peak: f64,
    pub i_nu_peak: f64,
    pub p: f64,
    pub regime: Regime,
}

impl SynPhotons {
    pub fn from_electrons(e: &SynElectrons, b: f64) -> Self {
        let nu_m = syn_nu(e.gamma_m, b);
        let nu_c = syn_nu(e.gamma_c, b);
        let nu_a = syn_nu(e.gamma_a, b);
        Self {
            nu_m,
            nu_c,
            nu_a,
            nu_max: syn_nu(e.gamma_max, b),
            nu_e_peak: nu_e_peak(e.regime, nu_a, nu_c, nu_m),
            i_nu_peak: e.i_nu_peak,
            p: e.p,
            regime: e.regime,
        }
    }

    /// Comoving specific intensity at comoving frequency `nu`.
    pub fn i_nu(&self, nu: f64) -> f64 {
        if self.i_nu_peak == 0.0 {
            return 0.0;
        }
        self.i_nu_peak * self.spectrum(nu)
    }

    /// Dimensionless spectral shape, continuous at every break and cut off
    /// exponentially above `ν_M`. Equals 1 at the peak of the optically
    /// thin segments in the regimes with `a` below both other breaks.
    pub fn spectrum(&self, nu: f64) -> f64 {
        let (a, c, m, p) = (self.nu_a, self.nu_c, self.nu_m, self.p);
        let thin_slow = -(p - 1.0) / 2.0;
        let thin_fast = -p / 2.0;

        let body = match self.regime {
            Regime::Amc => {
                if nu <= a {
                    (a / m).cbrt() * (nu / a).powi(2)
                } else if nu <= m {
                    (nu / m).cbrt()
                } else if nu <= c {
                    (nu / m).powf(thin_slow)
                } else {
                    (c / m).sqrt() * (nu / m).powf(thin_fast)
                }
            }
            Regime::Mac => {
                if nu <= m {
                    (m / a).powf((p + 4.0) / 2.0) * (nu / m).powi(2)
                } else if nu <= a {
                    (a / m).powf(thin_slow) * (nu / a).powf(2.5)
                } else if nu <= c {
                    (nu / m).powf(thin_slow)
                } else {
                    (c / m).sqrt() * (nu / m).powf(thin_fast)
                }
            }
            Regime::Acm => {
                if nu <= a {
                    (a / c).cbrt() * (nu / a).powi(2)
                } else if nu <= c {
                    (nu / c).cbrt()
                } else if nu <= m {
                    (c / nu).sqrt()
                } else {
                    (c / m).sqrt() * (nu / m).powf(thin_fast)
                }
            }
            Regime::Cam => {
                let r = (c / a).sqrt() / 3.0;
                if nu <= a {
                    r * (nu / a).powi(2)
                } else if nu <= m {
                    r * (a / nu).sqrt()
                } else {
                    r * (a / m).sqrt() * (nu / m).powf(thin_fast)
                }
            }
            Regime::Mca | Regime::Cma => {
                let r = if self.regime == Regime::Mca {
                    (p - 1.0) / 3.0 * (c / a).sqrt() * (m / a).powf((p - 1.0) / 2.0)
                } else {
                    (c / a).sqrt() * (m / a).powf((p - 1.0) / 2.0) / 3.0
                };
                if nu <= a {
                    r * (nu / a).powi(2)
                } else {
                    r * (nu / a).powf(thin_fast)
                }
            }
        };
        body * (-nu / self.nu_max).exp()
    }
}

/// Photon spectra for every cell, reading the field from the shock grid.
pub fn gen_syn_photons(
    electrons: &MeshGrid<SynElectrons>,
    shock: &ShockGrid,
) -> Result<MeshGrid<SynPhotons>> {
    let (n_theta, n_r) = electrons.shape();
    if shock.shape() != (n_theta, n_r) {
        let (rows, cols) = shock.shape();
        return Err(AfterglowError::ShapeMismatch {
            expected: vec![n_theta, n_r],
            actual: vec![rows, cols],
        }
        .into());
    }
    info!(sectors = n_theta, radii = n_r, "Generating photon spectra");

    let rows = (0..n_theta)
        .into_par_iter()
        .map(|j| {
            electrons
                .row(j)
                .iter()
                .zip(shock.b.row(j))
                .map(|(e, &b)| SynPhotons::from_electrons(e, b))
                .collect()
        })
        .collect();
    Ok(MeshGrid::from_rows(rows)?)
}
