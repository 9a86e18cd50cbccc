//! Configuration for a pipeline run.

use crate::error::{PipelineError, Result};
use afterglow_common::{
    adaptive_theta_space, linspace, logspace, AfterglowResult, Coord, GaussianJet, Ism, Jet,
    Medium, Microphysics, PowerLawJet, TopHatJet, Wind,
};
use observer::ObserverParams;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;
use synchrotron::InverseCompton;

/// Everything a run needs. `Default` is the canonical on-axis top-hat jet
/// in a uniform medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub medium: MediumConfig,
    pub jet: JetConfig,
    pub micro: Microphysics,
    pub grid: GridConfig,
    pub observer: ObserverParams,
    pub light_curve: LightCurveConfig,
    pub inverse_compton: InverseCompton,
    /// Solve the reverse shock alongside the forward shock.
    pub reverse_shock: bool,
}

impl PipelineConfig {
    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `AFTERGLOW_*` overrides from `lookup` over the defaults.
    /// Values that fail to parse are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let count = |key: &str| lookup(key).and_then(|v| v.trim().parse::<usize>().ok());

        if let Some(n) = number("AFTERGLOW_N_ISM") {
            config.medium = MediumConfig::Ism { n };
        }
        if let Some(a_star) = number("AFTERGLOW_A_STAR") {
            config.medium = MediumConfig::Wind { a_star };
        }

        if let Some(val) = lookup("AFTERGLOW_JET") {
            if let Some(profile) = JetProfile::from_str(&val) {
                config.jet.profile = profile;
            }
        }
        if let Some(v) = number("AFTERGLOW_E_ISO") {
            config.jet.e_iso = v;
        }
        if let Some(v) = number("AFTERGLOW_GAMMA0") {
            config.jet.gamma0 = v;
        }
        if let Some(v) = number("AFTERGLOW_THETA_C") {
            config.jet.theta_c = v;
        }
        if let Some(v) = number("AFTERGLOW_DURATION") {
            config.jet.duration = v;
        }

        if let Some(v) = number("AFTERGLOW_EPS_E") {
            config.micro.eps_e = v;
        }
        if let Some(v) = number("AFTERGLOW_EPS_B") {
            config.micro.eps_b = v;
        }
        if let Some(v) = number("AFTERGLOW_P") {
            config.micro.p = v;
        }
        if let Some(v) = number("AFTERGLOW_XI") {
            config.micro.xi = v;
        }

        if let Some(v) = number("AFTERGLOW_R_MIN") {
            config.grid.r_min = v;
        }
        if let Some(v) = number("AFTERGLOW_R_MAX") {
            config.grid.r_max = v;
        }
        if let Some(v) = count("AFTERGLOW_R_NUM") {
            config.grid.r_num = v;
        }
        if let Some(v) = count("AFTERGLOW_THETA_NUM") {
            config.grid.theta_num = v;
        }

        if let Some(v) = number("AFTERGLOW_THETA_OBS") {
            config.observer.theta_obs = v;
        }
        if let Some(v) = number("AFTERGLOW_LUMI_DIST") {
            config.observer.lumi_dist = v;
        }
        if let Some(v) = number("AFTERGLOW_Z") {
            config.observer.z = v;
        }

        if let Some(val) = lookup("AFTERGLOW_REVERSE_SHOCK") {
            config.reverse_shock = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Load configuration from a YAML file; missing keys keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.medium.validate()?;
        self.jet.validate()?;
        self.micro.validate()?;
        self.grid.validate()?;
        self.observer.validate()?;
        self.light_curve.validate()?;
        if let InverseCompton::Fixed(y) = self.inverse_compton {
            if !(y >= 0.0 && y.is_finite()) {
                return Err(format!("inverse Compton Y must be >= 0, got {}", y));
            }
        }
        Ok(())
    }

    /// Validate and convert into the pipeline error type.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(PipelineError::Config)
    }
}

/// Circumburst density profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediumConfig {
    /// Uniform medium of number density `n`, cm^-3.
    Ism { n: f64 },
    /// Stellar wind `ρ = A / r²` with `A = a_star × 5e11 g/cm`.
    Wind { a_star: f64 },
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self::Ism { n: 1.0 }
    }
}

impl MediumConfig {
    pub fn build(&self) -> AfterglowResult<Box<dyn Medium>> {
        Ok(match *self {
            Self::Ism { n } => Box::new(Ism::new(n)?),
            Self::Wind { a_star } => Box::new(Wind::from_a_star(a_star)?),
        })
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.build().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Angular energy profile of the jet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JetProfile {
    TopHat,
    Gaussian,
    PowerLaw { k: f64 },
}

impl JetProfile {
    /// Parse a profile name; power-law wings default to `k = 2`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tophat" | "top_hat" => Some(Self::TopHat),
            "gaussian" => Some(Self::Gaussian),
            "powerlaw" | "power_law" => Some(Self::PowerLaw { k: 2.0 }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetConfig {
    pub profile: JetProfile,
    /// Core half-opening angle, rad.
    pub theta_c: f64,
    /// Isotropic-equivalent energy of the core, erg.
    pub e_iso: f64,
    /// Initial Lorentz factor of the core.
    pub gamma0: f64,
    /// Engine duration, s.
    pub duration: f64,
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            profile: JetProfile::TopHat,
            theta_c: 0.1,
            e_iso: 1e53,
            gamma0: 300.0,
            duration: 1.0,
        }
    }
}

impl JetConfig {
    pub fn build(&self) -> AfterglowResult<Box<dyn Jet>> {
        let Self {
            theta_c,
            e_iso,
            gamma0,
            duration,
            ..
        } = *self;
        Ok(match self.profile {
            JetProfile::TopHat => Box::new(TopHatJet::new(theta_c, e_iso, gamma0, duration)?),
            JetProfile::Gaussian => Box::new(GaussianJet::new(theta_c, e_iso, gamma0, duration)?),
            JetProfile::PowerLaw { k } => {
                Box::new(PowerLawJet::new(theta_c, e_iso, gamma0, k, duration)?)
            }
        })
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.build().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Extent and resolution of the `(phi, theta, r)` grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Innermost radius boundary, cm.
    pub r_min: f64,
    /// Outermost radius boundary, cm.
    pub r_max: f64,
    /// Polar extent from the axis, rad.
    pub theta_max: f64,
    pub r_num: usize,
    pub theta_num: usize,
    pub phi_num: usize,
    /// Concentrate polar cells where the jet's Lorentz factor varies fastest.
    pub adaptive_theta: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            r_min: 1e15,
            r_max: 1e19,
            theta_max: 0.3,
            r_num: 256,
            theta_num: 32,
            phi_num: 1,
            adaptive_theta: false,
        }
    }
}

impl GridConfig {
    /// Coordinate grid; polar boundaries follow `gamma0` when adaptive.
    pub fn build(&self, gamma0: impl Fn(f64) -> f64) -> AfterglowResult<Coord> {
        let theta_b = if self.adaptive_theta {
            adaptive_theta_space(self.theta_num, gamma0, self.theta_max)?
        } else {
            linspace(0.0, self.theta_max, self.theta_num + 1)?
        };
        Coord::new(
            logspace(self.r_min, self.r_max, self.r_num + 1)?,
            theta_b,
            linspace(0.0, 2.0 * PI, self.phi_num + 1)?,
        )
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.r_min > 0.0 && self.r_max > self.r_min) {
            return Err(format!(
                "radius range must satisfy 0 < r_min < r_max, got [{}, {}]",
                self.r_min, self.r_max
            ));
        }
        if !(self.theta_max > 0.0 && self.theta_max <= PI) {
            return Err(format!("theta_max must be in (0, pi], got {}", self.theta_max));
        }
        if self.r_num == 0 || self.theta_num == 0 || self.phi_num == 0 {
            return Err("r_num, theta_num and phi_num must be > 0".to_string());
        }
        Ok(())
    }
}

/// How observed fluxes are evaluated over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LightCurveMethod {
    /// Interpolate each sky column at the requested times.
    #[default]
    Interpolated,
    /// Average over log-spaced bins of the sorted arrival-time surface.
    Binned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightCurveConfig {
    /// First observed time, s.
    pub t_min: f64,
    /// Last observed time, s.
    pub t_max: f64,
    pub t_num: usize,
    /// Observed frequencies, Hz.
    pub frequencies: Vec<f64>,
    pub method: LightCurveMethod,
    /// Integrate arrival times along each ray instead of using the engine
    /// times from the shock solution.
    pub integrate_arrival: bool,
    /// Frequency bands `[nu_lo, nu_hi]`, Hz, whose integrated flux is
    /// reported alongside the monochromatic curves.
    pub bands: Vec<[f64; 2]>,
    /// Further viewing angles, rad, observed at the same distance and
    /// redshift as the main observer.
    pub viewing_angles: Vec<f64>,
}

impl Default for LightCurveConfig {
    fn default() -> Self {
        Self {
            t_min: 1e2,
            t_max: 1e8,
            t_num: 64,
            frequencies: vec![1e9, 4.6e14, 2.4e17],
            method: LightCurveMethod::Interpolated,
            integrate_arrival: false,
            bands: Vec::new(),
            viewing_angles: Vec::new(),
        }
    }
}

impl LightCurveConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.t_min > 0.0 && self.t_max > self.t_min) {
            return Err(format!(
                "time range must satisfy 0 < t_min < t_max, got [{}, {}]",
                self.t_min, self.t_max
            ));
        }
        if self.t_num < 2 {
            return Err(format!("t_num must be >= 2, got {}", self.t_num));
        }
        if let Some(nu) = self.frequencies.iter().find(|&&nu| !(nu > 0.0)) {
            return Err(format!("frequencies must be > 0, got {}", nu));
        }
        if let Some(band) = self.bands.iter().find(|b| !(b[0] > 0.0 && b[1] > b[0])) {
            return Err(format!(
                "bands must satisfy 0 < nu_lo < nu_hi, got [{}, {}]",
                band[0], band[1]
            ));
        }
        if let Some(theta) = self
            .viewing_angles
            .iter()
            .find(|&&theta| !(0.0..=PI).contains(&theta))
        {
            return Err(format!("viewing angles must lie in [0, pi], got {}", theta));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.reverse_shock);
        assert_eq!(config.jet.e_iso, 1e53);
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AFTERGLOW_E_ISO", "2e52"),
            ("AFTERGLOW_A_STAR", "0.1"),
            ("AFTERGLOW_JET", "gaussian"),
            ("AFTERGLOW_R_NUM", "64"),
            ("AFTERGLOW_REVERSE_SHOCK", "true"),
            ("AFTERGLOW_GAMMA0", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = PipelineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.jet.e_iso, 2e52);
        assert_eq!(config.jet.gamma0, 300.0);
        assert_eq!(config.jet.profile, JetProfile::Gaussian);
        assert_eq!(config.medium, MediumConfig::Wind { a_star: 0.1 });
        assert_eq!(config.grid.r_num, 64);
        assert!(config.reverse_shock);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = PipelineConfig::default();
        config.grid.r_max = config.grid.r_min;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.micro.p = 0.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.inverse_compton = InverseCompton::Fixed(-1.0);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.light_curve.bands.push([1e17, 1e16]);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.light_curve.viewing_angles.push(-0.1);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.light_curve.frequencies.push(0.0);
        assert!(matches!(config.check(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "jet:\n  e_iso: 1.0e52\n  profile:\n    type: power_law\n    k: 3.0\nreverse_shock: true\n";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.jet.e_iso, 1e52);
        assert_eq!(config.jet.profile, JetProfile::PowerLaw { k: 3.0 });
        assert_eq!(config.jet.gamma0, 300.0);
        assert_eq!(config.medium, MediumConfig::default());
        assert!(config.reverse_shock);
    }

    #[test]
    fn test_grid_build() {
        let grid = GridConfig {
            r_num: 10,
            theta_num: 4,
            ..GridConfig::default()
        };
        let coord = grid.build(|_| 300.0).unwrap();
        assert_eq!(coord.shape(), (4, 10));
        assert_eq!(coord.r_b[0], 1e15);
    }
}
