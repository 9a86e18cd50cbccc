//! Right-hand sides of the blast-wave equations over radius.

use crate::jump::{adiabatic_index, e_thermal_down, n_down, relative_gamma, sound_speed};
use afterglow_common::con::{gamma_to_beta, C, C2, MP};
use afterglow_common::{Jet, Medium, Microphysics};
use nalgebra::SVector;
use numerics::OdeSystem;
use std::f64::consts::PI;

/// Floor on `β` so the kinematic rates stay finite for a shell at rest.
const BETA_FLOOR: f64 = 1e-12;

/// Reverse-shock upstream sound speed (cold ejecta), units of c.
pub const EJECTA_SOUND_SPEED: f64 = 1e-8;

/// Sector-level quantities shared by both equation sets.
#[derive(Clone, Copy)]
struct Sector<'a> {
    medium: &'a dyn Medium,
    jet: &'a dyn Jet,
    micro: &'a Microphysics,
    theta: f64,
    d_omega: f64,
    gamma0: f64,
}

impl Sector<'_> {
    /// Swept-up mass within the sector.
    fn swept_mass(&self, r: f64) -> f64 {
        self.medium.mass(r) * self.d_omega / (4.0 * PI)
    }

    /// Ejecta rest mass launched up to engine time `t_eng`.
    fn ejecta_mass(&self, t_eng: f64) -> f64 {
        self.jet.de_domega(self.theta, t_eng) * self.d_omega / (self.gamma0 * C2)
    }

    fn d_gamma_dr(&self, r: f64, gamma: f64, u: f64, t_eng: f64) -> f64 {
        let ad_idx = adiabatic_index(gamma);
        let gamma2 = gamma * gamma;
        let a1 = self.d_omega * r * r * self.medium.rho(r) * C2 / gamma
            * (gamma2 - 1.0)
            * (ad_idx * gamma - ad_idx + 1.0);
        let a2 = -(ad_idx - 1.0) / gamma * (ad_idx * gamma2 - ad_idx + 1.0) * 3.0 * u / r;
        let b1 = (self.ejecta_mass(t_eng) + self.swept_mass(r)) * C2;
        let b2 = (ad_idx * ad_idx * (gamma2 - 1.0) + 3.0 * ad_idx - 2.0) * u / gamma2;
        -(a1 + a2) / (b1 + b2)
    }

    fn du_dr(&self, r: f64, gamma: f64, u: f64, d_gamma: f64) -> f64 {
        let ad_idx = adiabatic_index(gamma);
        let swept = self.d_omega * r * r * self.medium.rho(r) * C2;
        let loss = 1.0 - self.micro.eps_e * self.micro.eta_rad;
        loss * (gamma - 1.0) * swept - (ad_idx - 1.0) * (3.0 / r - d_gamma / gamma) * u
    }
}

fn beta(gamma: f64) -> f64 {
    gamma_to_beta(gamma).max(BETA_FLOOR)
}

/// Engine time elapsed per unit radius, `(1 - β)/(βc)`.
pub fn dt_eng_dr(gamma: f64) -> f64 {
    let b = beta(gamma);
    (1.0 - b) / (b * C)
}

/// Comoving time elapsed per unit radius, `1/(Γβc)`.
pub fn dt_com_dr(gamma: f64) -> f64 {
    1.0 / (gamma * beta(gamma) * C)
}

/// Forward-shock-only system, state `{Γ, u, t_eng, t_com}`.
pub struct ForwardShockEqn<'a> {
    sector: Sector<'a>,
}

impl<'a> ForwardShockEqn<'a> {
    pub fn new(
        medium: &'a dyn Medium,
        jet: &'a dyn Jet,
        micro: &'a Microphysics,
        theta: f64,
        d_omega: f64,
    ) -> Self {
        Self {
            sector: Sector {
                medium,
                jet,
                micro,
                theta,
                d_omega,
                gamma0: jet.gamma0(theta),
            },
        }
    }

    pub fn gamma0(&self) -> f64 {
        self.sector.gamma0
    }

    /// Initial state at `r0`: coasting shell that has swept the mass inside `r0`.
    pub fn initial_state(&self, r0: f64) -> SVector<f64, 4> {
        let s = &self.sector;
        let beta0 = beta(s.gamma0);
        SVector::from([
            s.gamma0,
            (s.gamma0 - 1.0) * s.swept_mass(r0) * C2,
            r0 * (1.0 - beta0) / (beta0 * C),
            r0 / (s.gamma0 * beta0 * C),
        ])
    }
}

impl OdeSystem<4> for ForwardShockEqn<'_> {
    fn rhs(&self, r: f64, y: &SVector<f64, 4>) -> SVector<f64, 4> {
        let (gamma, u, t_eng) = (y[0], y[1], y[2]);
        let d_gamma = self.sector.d_gamma_dr(r, gamma, u, t_eng);
        SVector::from([
            d_gamma,
            self.sector.du_dr(r, gamma, u, d_gamma),
            dt_eng_dr(gamma),
            dt_com_dr(gamma),
        ])
    }
}

/// Forward plus reverse shock system,
/// state `{Γ, u, t_eng, t_com, D_RS, D_FS}`.
pub struct BlastWaveEqn<'a> {
    sector: Sector<'a>,
}

impl<'a> BlastWaveEqn<'a> {
    pub fn new(
        medium: &'a dyn Medium,
        jet: &'a dyn Jet,
        micro: &'a Microphysics,
        theta: f64,
        d_omega: f64,
    ) -> Self {
        Self {
            sector: Sector {
                medium,
                jet,
                micro,
                theta,
                d_omega,
                gamma0: jet.gamma0(theta),
            },
        }
    }

    pub fn gamma0(&self) -> f64 {
        self.sector.gamma0
    }

    pub fn theta(&self) -> f64 {
        self.sector.theta
    }

    /// Initial state at `r0`; the reverse-shocked region starts empty and the
    /// ejecta shell is as thick as the engine ran.
    pub fn initial_state(&self, r0: f64) -> SVector<f64, 6> {
        let s = &self.sector;
        let beta0 = beta(s.gamma0);
        SVector::from([
            s.gamma0,
            (s.gamma0 - 1.0) * s.swept_mass(r0) * C2,
            r0 * (1.0 - beta0) / (beta0 * C),
            r0 / (s.gamma0 * beta0 * C),
            0.0,
            C * s.jet.duration() * s.gamma0,
        ])
    }

    /// Comoving number density of unshocked ejecta.
    pub fn ejecta_density(&self, r: f64, t_eng: f64, d_fs: f64) -> f64 {
        let s = &self.sector;
        s.jet.de_domega(s.theta, t_eng) / (s.gamma0 * MP * C2 * r * r * d_fs)
    }

    fn d_fs_dr(&self, r: f64, gamma: f64) -> f64 {
        let n1 = self.sector.medium.number_density(r);
        let n2 = n_down(gamma, n1, self.sector.medium.sound_speed());
        if n2 <= 0.0 {
            return 0.0;
        }
        let ad_idx = adiabatic_index(gamma);
        let p2 = (ad_idx - 1.0) * e_thermal_down(gamma, n2);
        sound_speed(p2, ad_idx, n2 * MP) * dt_com_dr(gamma)
    }

    fn d_rs_dr(&self, r: f64, gamma: f64, t_eng: f64, d_fs: f64) -> f64 {
        let gamma0 = self.sector.gamma0;
        let n4 = self.ejecta_density(r, t_eng, d_fs);
        let n1 = self.sector.medium.number_density(r);
        if !(n4 > 0.0 && n1 > 0.0 && d_fs > 0.0) {
            return 0.0;
        }
        let gamma34 = relative_gamma(gamma0, gamma);
        let ad_idx3 = adiabatic_index(gamma34);
        let n3 = n4 * (ad_idx3 * gamma34 + 1.0) / (ad_idx3 - 1.0);
        gamma / (gamma0 * (n4 / n1).sqrt() * (1.0 - gamma0 * n4 / (gamma * n3)))
    }
}

impl OdeSystem<6> for BlastWaveEqn<'_> {
    fn rhs(&self, r: f64, y: &SVector<f64, 6>) -> SVector<f64, 6> {
        let (gamma, u, t_eng, d_fs) = (y[0], y[1], y[2], y[5]);
        let d_gamma = self.sector.d_gamma_dr(r, gamma, u, t_eng);
        SVector::from([
            d_gamma,
            self.sector.du_dr(r, gamma, u, d_gamma),
            dt_eng_dr(gamma),
            dt_com_dr(gamma),
            self.d_rs_dr(r, gamma, t_eng, d_fs),
            self.d_fs_dr(r, gamma),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterglow_common::{Ism, TopHatJet};

    fn setup() -> (Ism, TopHatJet, Microphysics) {
        (
            Ism::new(1.0).unwrap(),
            TopHatJet::new(0.1, 1e53, 300.0, 1.0).unwrap(),
            Microphysics::default(),
        )
    }

    #[test]
    fn test_gamma_decreases_in_uniform_medium() {
        let (ism, jet, micro) = setup();
        let eqn = ForwardShockEqn::new(&ism, &jet, &micro, 0.01, 1e-3);
        for r in [1e15, 1e16, 1e17] {
            let y = eqn.initial_state(r);
            assert!(eqn.rhs(r, &y)[0] < 0.0);
        }
    }

    #[test]
    fn test_kinematic_rates() {
        // Coasting at Γ = 300: dt_eng/dr ≈ 1/(2Γ²c)
        let rate = dt_eng_dr(300.0);
        assert!((rate * 2.0 * 300.0 * 300.0 * C - 1.0).abs() < 1e-4);
        assert!(dt_com_dr(1.0).is_finite());
        assert!(dt_eng_dr(1.0).is_finite());
    }

    #[test]
    fn test_dual_initial_state() {
        let (ism, jet, micro) = setup();
        let eqn = BlastWaveEqn::new(&ism, &jet, &micro, 0.01, 1e-3);
        let y = eqn.initial_state(1e15);
        assert_eq!(y[4], 0.0);
        assert!((y[5] - C * 300.0).abs() < 1.0);
        let dy = eqn.rhs(1e15, &y);
        assert!(dy.iter().all(|v| v.is_finite()));
        assert!(dy[4] > 0.0 && dy[5] > 0.0);
    }

    #[test]
    fn test_empty_sector_has_no_reverse_shock() {
        let (ism, jet, micro) = setup();
        let eqn = BlastWaveEqn::new(&ism, &jet, &micro, 0.5, 1e-3);
        let y = SVector::from([1.5, 1.0, 1.0, 1.0, 0.0, 1e12]);
        assert_eq!(eqn.d_rs_dr(1e16, 1.5, 1.0, 1e12), 0.0);
        assert!(eqn.rhs(1e16, &y).iter().all(|v| v.is_finite()));
    }
}
