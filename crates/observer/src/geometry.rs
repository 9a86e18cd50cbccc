//! Viewing geometry and relativistic beaming.

use afterglow_common::con::{gamma_to_beta, MPC};
use serde::{Deserialize, Serialize};

/// Where the observer sits relative to the jet axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverParams {
    /// Viewing angle from the jet axis, rad.
    pub theta_obs: f64,
    /// Luminosity distance, cm.
    pub lumi_dist: f64,
    /// Redshift.
    pub z: f64,
}

impl Default for ObserverParams {
    fn default() -> Self {
        Self {
            theta_obs: 0.0,
            lumi_dist: 1e28,
            z: 0.0,
        }
    }
}

impl ObserverParams {
    pub fn new(theta_obs: f64, lumi_dist: f64, z: f64) -> Self {
        Self {
            theta_obs,
            lumi_dist,
            z,
        }
    }

    /// Observer at `distance_mpc` megaparsecs.
    pub fn at_mpc(theta_obs: f64, distance_mpc: f64, z: f64) -> Self {
        Self::new(theta_obs, distance_mpc * MPC, z)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=std::f64::consts::PI).contains(&self.theta_obs) {
            return Err(format!(
                "theta_obs must be in [0, pi], got {}",
                self.theta_obs
            ));
        }
        if !(self.lumi_dist > 0.0 && self.lumi_dist.is_finite()) {
            return Err(format!("lumi_dist must be > 0, got {}", self.lumi_dist));
        }
        if !(self.z >= 0.0) {
            return Err(format!("z must be >= 0, got {}", self.z));
        }
        Ok(())
    }
}

/// Cosine of the angle between the radial direction `(theta, phi)` and the
/// line of sight at `theta_obs` in the `phi = 0` plane.
pub fn cos_view(theta: f64, phi: f64, theta_obs: f64) -> f64 {
    theta.sin() * phi.cos() * theta_obs.sin() + theta.cos() * theta_obs.cos()
}

/// Doppler factor `1 / (Γ (1 - β cos χ))`.
pub fn doppler(gamma: f64, cos_chi: f64) -> f64 {
    1.0 / (gamma * (1.0 - gamma_to_beta(gamma) * cos_chi))
}
