//! Inverse-Compton cooling of the synchrotron electrons.

use serde::{Deserialize, Serialize};

/// How the Compton parameter `Y` entering `γ_c` and `γ_M` is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "y", rename_all = "snake_case")]
pub enum InverseCompton {
    /// Synchrotron cooling only, `Y = 0`.
    #[default]
    None,
    /// Constant `Y` in every cell.
    Fixed(f64),
    /// Thomson-regime `Y` iterated together with `γ_c` and `γ_m`.
    SelfConsistent,
}

/// Iterations of the self-consistent `Y` before giving up on tighter
/// agreement and keeping the last value.
pub const MAX_IC_ITERATIONS: usize = 32;

/// Relative change in `Y` at which the self-consistent iteration stops.
pub const IC_TOLERANCE: f64 = 1e-6;

/// Thomson Compton parameter for electrons at injection `gamma_m` and
/// cooling `gamma_c`.
///
/// Only the fraction `η = min(1, (γ_c/γ_m)^{2-p})` of the electron energy
/// is radiated; `Y` solves `Y (1 + Y) = η ε_e / ε_B`.
pub fn thomson_y(eps_e: f64, eps_b: f64, gamma_m: f64, gamma_c: f64, p: f64) -> f64 {
    let eta = if gamma_c <= gamma_m {
        1.0
    } else {
        (gamma_c / gamma_m).powf(2.0 - p).min(1.0)
    };
    (-1.0 + (1.0 + 4.0 * eta * eps_e / eps_b).sqrt()) / 2.0
}
