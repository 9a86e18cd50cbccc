//! Physical constants and unit multipliers.
//!
//! All quantities in the workspace are CGS. The unit multipliers exist so
//! call sites can spell out what they mean (`1e53 * ERG`, `30.0 * DEG`) and
//! so writers can divide back into a display unit.

use std::f64::consts::PI;

// Units
pub const CM: f64 = 1.0;
pub const SEC: f64 = 1.0;
pub const GRAM: f64 = 1.0;
pub const ERG: f64 = 1.0;
pub const CM3: f64 = CM * CM * CM;
pub const DAY: f64 = 86400.0 * SEC;
pub const DEG: f64 = PI / 180.0;
pub const EV: f64 = 1.602_176_634e-12 * ERG;
pub const KEV: f64 = 1e3 * EV;
pub const MPC: f64 = 3.085_677_581e24 * CM;
pub const GAUSS: f64 = 1.0;
pub const MJY: f64 = 1e-26 * ERG / (SEC * CM * CM);

// Physical constants
/// Speed of light.
pub const C: f64 = 2.997_924_58e10 * CM / SEC;
pub const C2: f64 = C * C;
/// Proton mass.
pub const MP: f64 = 1.672_621_923e-24 * GRAM;
/// Electron mass.
pub const ME: f64 = 9.109_383_7e-28 * GRAM;
/// Elementary charge (esu).
pub const E: f64 = 4.803_204_7e-10;
pub const E2: f64 = E * E;
pub const E3: f64 = E2 * E;
/// Thomson cross section.
pub const SIGMA_T: f64 = 6.652_458_73e-25 * CM * CM;
/// Planck constant.
pub const H: f64 = 6.626_070_15e-27 * ERG * SEC;
/// Proton to electron mass ratio.
pub const MP_OVER_ME: f64 = MP / ME;

/// Photon frequency for a photon energy.
pub fn ev_to_hz(energy: f64) -> f64 {
    energy / H
}

/// Lorentz factor to dimensionless velocity.
pub fn gamma_to_beta(gamma: f64) -> f64 {
    (1.0 - 1.0 / (gamma * gamma)).max(0.0).sqrt()
}
