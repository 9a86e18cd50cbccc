//! Shock jump conditions and equation of state.

use afterglow_common::con::{C, C2, MP};
use std::f64::consts::PI;

/// Mach number above which the strong-shock limit applies.
const STRONG_SHOCK_MACH: f64 = 10.0;

/// Adiabatic index interpolating between 4/3 (relativistic) and 5/3.
pub fn adiabatic_index(gamma: f64) -> f64 {
    (4.0 * gamma + 1.0) / (3.0 * gamma)
}

/// Downstream proton number density behind a shock with relative Lorentz
/// factor `gamma_rel` running into a medium of density `n_up` whose sound
/// speed is `cs_up` (in units of c).
///
/// Returns zero when the shock is subsonic and cannot form.
pub fn n_down(gamma_rel: f64, n_up: f64, cs_up: f64) -> f64 {
    let u4 = (gamma_rel * gamma_rel - 1.0).max(0.0).sqrt();
    let us4 = 4.0 * u4 * ((1.0 + u4 * u4) / (8.0 * u4 * u4 + 9.0)).sqrt();
    let mach = us4 / cs_up;

    if mach > STRONG_SHOCK_MACH {
        4.0 * gamma_rel * n_up
    } else if mach >= 1.0 {
        let ad_idx = adiabatic_index(gamma_rel);
        n_up * (ad_idx + 1.0) * mach * mach / ((ad_idx - 1.0) * mach * mach + 2.0)
    } else {
        0.0
    }
}

/// Downstream thermal energy density.
pub fn e_thermal_down(gamma_rel: f64, n_down: f64) -> f64 {
    n_down * (gamma_rel - 1.0) * MP * C2
}

/// Comoving magnetic field at equipartition fraction `eps_b`.
pub fn co_moving_b(eps_b: f64, e_thermal: f64) -> f64 {
    (8.0 * PI * eps_b * e_thermal).sqrt()
}

/// Relativistic sound speed in cm/s.
pub fn sound_speed(pressure: f64, ad_idx: f64, rho_rest: f64) -> f64 {
    let denom = rho_rest * C2 + ad_idx / (ad_idx - 1.0) * pressure;
    if denom <= 0.0 {
        return 0.0;
    }
    (ad_idx * pressure / denom).sqrt() * C
}

/// Relative Lorentz factor of two flows moving along the same direction,
/// in the `Γ ≫ 1` approximation.
pub fn relative_gamma(gamma_a: f64, gamma_b: f64) -> f64 {
    0.5 * (gamma_a / gamma_b + gamma_b / gamma_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adiabatic_index_limits() {
        assert!((adiabatic_index(1.0) - 5.0 / 3.0).abs() < 1e-12);
        assert!((adiabatic_index(1e8) - 4.0 / 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_strong_shock_limit() {
        assert_eq!(n_down(100.0, 1.0, 1e-5), 400.0);
    }

    #[test]
    fn test_subsonic_shock_does_not_form() {
        assert_eq!(n_down(1.0, 1.0, 1e-5), 0.0);
        assert_eq!(n_down(1.0 + 1e-14, 1.0, 1e-2), 0.0);
    }

    #[test]
    fn test_intermediate_mach_compression() {
        // Pick gamma_rel so that the Mach number lands between 1 and 10.
        let cs = 0.01;
        let gamma_rel = 1.0 + 1e-4;
        let n = n_down(gamma_rel, 1.0, cs);
        assert!(n > 1.0 && n < 4.0 * gamma_rel, "compression {}", n);
    }

    #[test]
    fn test_equipartition_field() {
        let e = 1.0;
        let b = co_moving_b(0.01, e);
        assert!((b * b / (8.0 * PI) - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_sound_speed_relativistic_limit() {
        // Radiation-dominated gas: cs -> c / sqrt(3)
        let cs = sound_speed(1e30, 4.0 / 3.0, 1e-30);
        assert!((cs / C - 1.0 / 3f64.sqrt()).abs() < 1e-6);
        assert_eq!(sound_speed(0.0, 4.0 / 3.0, 0.0), 0.0);
    }
}
