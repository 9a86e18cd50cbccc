//! Characteristic Lorentz factors and frequencies of the synchrotron spectrum.

use crate::error::{Result, SynchrotronError};
use crate::regime::Regime;
use afterglow_common::con::{C, C2, E, E3, ME, MP_OVER_ME, SIGMA_T};
use numerics::{root_bisection, DEFAULT_BISECTION_TOL};
use std::f64::consts::PI;

/// Offset from `γ_M` at the top of the `p == 2` bracket, where the mean
/// of the truncated distribution is still finite.
const GAMMA_MAX_BRACKET: f64 = 1.0 - 1e-9;

/// Comoving synchrotron frequency of an electron with Lorentz factor `gamma`.
pub fn syn_nu(gamma: f64, b: f64) -> f64 {
    3.0 * E * b * gamma * gamma / (4.0 * PI * ME * C)
}

/// Lorentz factor radiating at comoving frequency `nu`; inverse of [`syn_nu`].
pub fn syn_gamma(nu: f64, b: f64) -> f64 {
    (nu * 4.0 * PI * ME * C / (3.0 * E * b)).sqrt()
}

/// Peak spectral power per electron.
pub fn syn_p_nu_peak(b: f64, p: f64) -> f64 {
    (p - 1.0) / 2.0 * 3f64.sqrt() * E3 * b / (ME * C2)
}

/// Maximum Lorentz factor where acceleration balances radiative losses.
pub fn gamma_max(b: f64, zeta: f64, y: f64) -> f64 {
    (6.0 * PI * E / (SIGMA_T * b * zeta * (1.0 + y))).sqrt()
}

/// Mean electron Lorentz factor behind a shock with Lorentz factor `gamma`.
pub fn gamma_bar(gamma: f64, eps_e: f64, xi: f64) -> f64 {
    1.0 + eps_e * (gamma - 1.0) * MP_OVER_ME / xi
}

/// Injection Lorentz factor of a power law `γ^-p` truncated at `gamma_max`
/// whose mean is `mean`, floored at 1.
pub fn gamma_min(mean: f64, gamma_max: f64, p: f64) -> Result<f64> {
    let gamma_m = if p > 2.0 {
        (p - 2.0) / (p - 1.0) * mean
    } else if p < 2.0 {
        ((2.0 - p) / (p - 1.0) * mean * gamma_max.powf(p - 2.0)).powf(1.0 / (p - 1.0))
    } else {
        gamma_min_flat(mean, gamma_max)?
    };
    Ok(gamma_m.max(1.0))
}

/// `p == 2`: the mean of `γ^-2` over `[x, γ_M]` is
/// `ln(γ_M/x) / (1/x - 1/γ_M)`, increasing in `x`.
fn gamma_min_flat(mean: f64, gamma_max: f64) -> Result<f64> {
    let excess = |x: f64| (gamma_max / x).ln() / (1.0 / x - 1.0 / gamma_max) - mean;
    if excess(1.0) >= 0.0 {
        return Ok(1.0);
    }
    root_bisection(excess, 1.0, gamma_max * GAMMA_MAX_BRACKET, DEFAULT_BISECTION_TOL)
        .map_err(|e| SynchrotronError::root_solve("gamma_m", e))
}

/// Cooling Lorentz factor after comoving time `t_com`; the positive root
/// of `γ² - γ̄_c γ - 1 = 0`, so it never drops below 1.
pub fn gamma_cool(t_com: f64, b: f64, y: f64) -> f64 {
    let bar = 6.0 * PI * ME * C / (SIGMA_T * b * b * (1.0 + y) * t_com);
    (bar + (bar * bar + 4.0).sqrt()) / 2.0
}

/// Self-absorption Lorentz factor, floored at 1.
///
/// Equates the thermal Rayleigh-Jeans intensity `2 kT ν²/c²` with the
/// optically thin `ν^{1/3}` segment below the peak. If the absorption
/// frequency lands above the peak, or the peak electrons are cold, the
/// temperature is set by the absorbing electrons themselves and the
/// balance `(A x - 1) x⁴ = I / (2 m_e (γ̂ - 1))` with `x = √ν` is solved
/// by bisection between the peak and maximum frequencies.
pub fn gamma_absorb(
    ad_idx: f64,
    b: f64,
    i_nu_peak: f64,
    gamma_m: f64,
    gamma_c: f64,
    gamma_max: f64,
) -> Result<f64> {
    let gamma_peak = gamma_m.min(gamma_c);
    let nu_peak = syn_nu(gamma_peak, b);
    let kt = (gamma_peak - 1.0) * ME * C2 * (ad_idx - 1.0);
    let mut nu_a = (i_nu_peak * C2 / nu_peak.cbrt() / kt / 2.0).powf(3.0 / 5.0);

    if (gamma_peak - 1.0).abs() < 1e-6 || !(nu_a <= nu_peak) {
        let nu_max = syn_nu(gamma_max, b);
        let a = (4.0 * PI * ME * C / (3.0 * E * b)).sqrt();
        let rhs = i_nu_peak / (2.0 * ME * (ad_idx - 1.0));
        let x = root_bisection(
            |x: f64| a * x.powi(5) - x.powi(4) - rhs,
            nu_peak.sqrt(),
            nu_max.sqrt(),
            DEFAULT_BISECTION_TOL,
        )
        .map_err(|e| SynchrotronError::root_solve("gamma_a", e))?;
        nu_a = x * x;
    }

    Ok(syn_gamma(nu_a, b).max(1.0))
}

/// Frequency at which `ν F_ν` peaks.
pub fn nu_e_peak(regime: Regime, nu_a: f64, nu_c: f64, nu_m: f64) -> f64 {
    match regime {
        Regime::Amc | Regime::Mac => nu_c,
        Regime::Acm => nu_m,
        Regime::Cam => {
            if nu_a * nu_a < nu_m * nu_c {
                nu_m
            } else {
                nu_a
            }
        }
        Regime::Mca | Regime::Cma => nu_a,
    }
}

/// Lorentz factor at which the electron number spectrum `γ N(γ)` peaks.
pub fn gamma_n_peak(gamma_a: f64, gamma_c: f64, gamma_m: f64) -> f64 {
    if gamma_a > gamma_c {
        gamma_a
    } else {
        gamma_m.min(gamma_c)
    }
}
