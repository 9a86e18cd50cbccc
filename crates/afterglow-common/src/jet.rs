//! Angular energy and Lorentz factor profiles of the ejecta.

use crate::error::{AfterglowError, AfterglowResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Energy and Lorentz factor distribution of the outflow.
pub trait Jet: Send + Sync {
    /// Initial Lorentz factor at polar angle `theta`.
    fn gamma0(&self, theta: f64) -> f64;

    /// Isotropic-equivalent energy per steradian injected up to engine time
    /// `t_eng`.
    fn de_domega(&self, theta: f64, t_eng: f64) -> f64;

    /// Engine activity duration, sets the initial ejecta shell width.
    fn duration(&self) -> f64;
}

fn check_common(e_iso: f64, gamma0: f64, theta_c: f64, duration: f64) -> AfterglowResult<()> {
    if !(e_iso > 0.0 && e_iso.is_finite()) {
        return Err(AfterglowError::invalid_parameter(
            "e_iso",
            format!("must be positive, got {}", e_iso),
        ));
    }
    if !(gamma0 > 1.0 && gamma0.is_finite()) {
        return Err(AfterglowError::invalid_parameter(
            "gamma0",
            format!("must be > 1, got {}", gamma0),
        ));
    }
    if !(theta_c > 0.0 && theta_c <= PI) {
        return Err(AfterglowError::invalid_parameter(
            "theta_c",
            format!("must lie in (0, pi], got {}", theta_c),
        ));
    }
    if !(duration > 0.0 && duration.is_finite()) {
        return Err(AfterglowError::invalid_parameter(
            "duration",
            format!("must be positive, got {}", duration),
        ));
    }
    Ok(())
}

/// Uniform jet with sharp edges at `theta_c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopHatJet {
    pub theta_c: f64,
    pub e_iso: f64,
    pub gamma0: f64,
    pub duration: f64,
}

impl TopHatJet {
    pub fn new(theta_c: f64, e_iso: f64, gamma0: f64, duration: f64) -> AfterglowResult<Self> {
        check_common(e_iso, gamma0, theta_c, duration)?;
        Ok(Self {
            theta_c,
            e_iso,
            gamma0,
            duration,
        })
    }
}

impl Jet for TopHatJet {
    fn gamma0(&self, theta: f64) -> f64 {
        if theta <= self.theta_c {
            self.gamma0
        } else {
            1.0
        }
    }

    fn de_domega(&self, theta: f64, _t_eng: f64) -> f64 {
        if theta <= self.theta_c {
            self.e_iso / (4.0 * PI)
        } else {
            0.0
        }
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Jet with Gaussian wings, `exp(-theta^2 / (2 theta_c^2))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianJet {
    pub theta_c: f64,
    pub e_iso: f64,
    pub gamma0: f64,
    pub duration: f64,
}

impl GaussianJet {
    pub fn new(theta_c: f64, e_iso: f64, gamma0: f64, duration: f64) -> AfterglowResult<Self> {
        check_common(e_iso, gamma0, theta_c, duration)?;
        Ok(Self {
            theta_c,
            e_iso,
            gamma0,
            duration,
        })
    }

    fn profile(&self, theta: f64) -> f64 {
        (-theta * theta / (2.0 * self.theta_c * self.theta_c)).exp()
    }
}

impl Jet for GaussianJet {
    fn gamma0(&self, theta: f64) -> f64 {
        1.0 + (self.gamma0 - 1.0) * self.profile(theta)
    }

    fn de_domega(&self, theta: f64, _t_eng: f64) -> f64 {
        self.e_iso / (4.0 * PI) * self.profile(theta)
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Uniform core with power-law wings `(theta / theta_c)^-k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawJet {
    pub theta_c: f64,
    pub e_iso: f64,
    pub gamma0: f64,
    pub k: f64,
    pub duration: f64,
}

impl PowerLawJet {
    pub fn new(
        theta_c: f64,
        e_iso: f64,
        gamma0: f64,
        k: f64,
        duration: f64,
    ) -> AfterglowResult<Self> {
        check_common(e_iso, gamma0, theta_c, duration)?;
        if !(k > 0.0) {
            return Err(AfterglowError::invalid_parameter(
                "k",
                format!("power-law index must be > 0, got {}", k),
            ));
        }
        Ok(Self {
            theta_c,
            e_iso,
            gamma0,
            k,
            duration,
        })
    }

    fn profile(&self, theta: f64) -> f64 {
        if theta <= self.theta_c {
            1.0
        } else {
            (theta / self.theta_c).powf(-self.k)
        }
    }
}

impl Jet for PowerLawJet {
    fn gamma0(&self, theta: f64) -> f64 {
        1.0 + (self.gamma0 - 1.0) * self.profile(theta)
    }

    fn de_domega(&self, theta: f64, _t_eng: f64) -> f64 {
        self.e_iso / (4.0 * PI) * self.profile(theta)
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}
