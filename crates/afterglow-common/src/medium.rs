//! Circumburst medium profiles and shock microphysics.

use crate::constants::{C, MP};
use crate::error::{AfterglowError, AfterglowResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mass density of the `A_*` wind normalization, g/cm.
pub const WIND_A_STAR: f64 = 5e11;

/// Upstream sound speed of a cold medium, in units of c.
pub const DEFAULT_SOUND_SPEED: f64 = 1e-5;

/// Density profile the blast wave sweeps up.
pub trait Medium: Send + Sync {
    /// Mass density at radius `r`.
    fn rho(&self, r: f64) -> f64;

    /// Mass enclosed within radius `r` over the full sphere.
    fn mass(&self, r: f64) -> f64;

    /// Upstream sound speed in units of c.
    fn sound_speed(&self) -> f64 {
        DEFAULT_SOUND_SPEED
    }

    /// Number density of protons at radius `r`.
    fn number_density(&self, r: f64) -> f64 {
        self.rho(r) / MP
    }
}

/// Uniform interstellar medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ism {
    /// Number density, cm^-3.
    pub n: f64,
    /// Sound speed in units of c.
    pub cs: f64,
}

impl Ism {
    pub fn new(n: f64) -> AfterglowResult<Self> {
        if !(n > 0.0 && n.is_finite()) {
            return Err(AfterglowError::invalid_parameter(
                "n_ism",
                format!("density must be positive, got {}", n),
            ));
        }
        Ok(Self {
            n,
            cs: DEFAULT_SOUND_SPEED,
        })
    }
}

impl Medium for Ism {
    fn rho(&self, _r: f64) -> f64 {
        self.n * MP
    }

    fn mass(&self, r: f64) -> f64 {
        4.0 * PI / 3.0 * r * r * r * self.n * MP
    }

    fn sound_speed(&self) -> f64 {
        self.cs
    }
}

/// Stellar wind, `rho = A / r^2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Wind parameter in g/cm.
    pub a: f64,
    pub cs: f64,
}

impl Wind {
    /// Wind with `A = a_star * 5e11 g/cm`.
    pub fn from_a_star(a_star: f64) -> AfterglowResult<Self> {
        if !(a_star > 0.0 && a_star.is_finite()) {
            return Err(AfterglowError::invalid_parameter(
                "a_star",
                format!("wind parameter must be positive, got {}", a_star),
            ));
        }
        Ok(Self {
            a: a_star * WIND_A_STAR,
            cs: DEFAULT_SOUND_SPEED,
        })
    }
}

impl Medium for Wind {
    fn rho(&self, r: f64) -> f64 {
        self.a / (r * r)
    }

    fn mass(&self, r: f64) -> f64 {
        4.0 * PI * self.a * r
    }

    fn sound_speed(&self) -> f64 {
        self.cs
    }
}

/// Energy partition and electron distribution at the shock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Microphysics {
    /// Fraction of thermal energy in electrons.
    pub eps_e: f64,
    /// Fraction of thermal energy in magnetic field.
    pub eps_b: f64,
    /// Fraction of electrons accelerated.
    pub xi: f64,
    /// Acceleration efficiency entering the maximum Lorentz factor.
    pub zeta: f64,
    /// Radiative efficiency of the electrons (0 adiabatic, 1 fully radiative).
    pub eta_rad: f64,
    /// Power-law index of the electron distribution.
    pub p: f64,
}

impl Default for Microphysics {
    fn default() -> Self {
        Self {
            eps_e: 0.1,
            eps_b: 0.01,
            xi: 1.0,
            zeta: 1.0,
            eta_rad: 0.0,
            p: 2.3,
        }
    }
}

impl Microphysics {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.eps_e > 0.0 && self.eps_e <= 1.0) {
            return Err(format!("eps_e must be in (0, 1], got {}", self.eps_e));
        }
        if !(self.eps_b > 0.0 && self.eps_b <= 1.0) {
            return Err(format!("eps_b must be in (0, 1], got {}", self.eps_b));
        }
        if !(self.xi > 0.0 && self.xi <= 1.0) {
            return Err(format!("xi must be in (0, 1], got {}", self.xi));
        }
        if !(self.zeta > 0.0) {
            return Err(format!("zeta must be > 0, got {}", self.zeta));
        }
        if !(0.0..=1.0).contains(&self.eta_rad) {
            return Err(format!("eta_rad must be in [0, 1], got {}", self.eta_rad));
        }
        if !(self.p > 1.0) {
            return Err(format!("p must be > 1, got {}", self.p));
        }
        Ok(())
    }
}

/// Sound speed of the medium in cm/s.
pub fn sound_speed_cgs(medium: &dyn Medium) -> f64 {
    medium.sound_speed() * C
}
