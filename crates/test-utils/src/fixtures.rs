//! Common test fixtures for afterglow tests.
//!
//! Plain numbers only; crates build their own typed collaborators from them
//! so this crate stays at the bottom of the dependency graph.

/// The canonical on-axis top-hat jet in a uniform medium.
pub mod canonical {
    /// Isotropic-equivalent energy, erg.
    pub const E_ISO: f64 = 1e53;
    /// Initial Lorentz factor.
    pub const GAMMA0: f64 = 300.0;
    /// Jet half-opening angle, rad.
    pub const THETA_C: f64 = 0.1;
    /// Engine duration, s.
    pub const DURATION: f64 = 1.0;
    /// Medium number density, cm^-3.
    pub const N_ISM: f64 = 1.0;

    pub const EPS_E: f64 = 0.1;
    pub const EPS_B: f64 = 0.01;
    pub const P: f64 = 2.3;

    /// Luminosity distance, cm (about 3.2 Gpc).
    pub const LUMI_DIST: f64 = 1e28;
    pub const Z: f64 = 0.0;

    /// Deceleration radius of this setup, cm, to about 1%.
    pub const R_DEC: f64 = 5.6e16;
}

/// Breakpoint sets `(gamma_a, gamma_c, gamma_m)` for each of the six
/// orderings, first to sixth.
pub mod regimes {
    pub const SLOW_THIN: (f64, f64, f64) = (10.0, 1e5, 1e3);
    pub const SLOW_MID: (f64, f64, f64) = (1e4, 1e5, 1e3);
    pub const FAST_THIN: (f64, f64, f64) = (10.0, 1e3, 1e5);
    pub const FAST_MID: (f64, f64, f64) = (1e4, 1e3, 1e5);
    pub const SLOW_THICK: (f64, f64, f64) = (1e6, 1e5, 1e3);
    pub const FAST_THICK: (f64, f64, f64) = (1e6, 1e3, 1e5);

    pub const ALL: [(f64, f64, f64); 6] = [
        SLOW_THIN, SLOW_MID, FAST_THIN, FAST_MID, SLOW_THICK, FAST_THICK,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_fixtures_are_distinct() {
        for (i, a) in regimes::ALL.iter().enumerate() {
            for b in regimes::ALL.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
