//! Spectral regimes selected by the ordering of the three breaks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering of the self-absorption (`a`), cooling (`c`) and injection
/// (`m`) breaks, named from lowest to highest.
///
/// Ties are resolved by testing the variants in declaration order with
/// non-strict comparisons, so the first matching ordering wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// `a <= m <= c`: slow cooling, optically thin at the peak.
    Amc,
    /// `m <= a <= c`: slow cooling, absorbed above injection.
    Mac,
    /// `a <= c <= m`: fast cooling, optically thin at the peak.
    Acm,
    /// `c <= a <= m`: fast cooling, absorbed above cooling.
    Cam,
    /// `m <= c <= a`: slow cooling, thick up to above both breaks.
    Mca,
    /// `c <= m <= a`: fast cooling, thick up to above both breaks.
    Cma,
}

impl Regime {
    pub const ALL: [Regime; 6] = [
        Regime::Amc,
        Regime::Mac,
        Regime::Acm,
        Regime::Cam,
        Regime::Mca,
        Regime::Cma,
    ];

    /// Classify a triple of breaks. Returns `None` only when a comparison
    /// is undefined (a NaN break).
    pub fn classify(a: f64, c: f64, m: f64) -> Option<Self> {
        if a <= m && m <= c {
            Some(Regime::Amc)
        } else if m <= a && a <= c {
            Some(Regime::Mac)
        } else if a <= c && c <= m {
            Some(Regime::Acm)
        } else if c <= a && a <= m {
            Some(Regime::Cam)
        } else if m <= c && c <= a {
            Some(Regime::Mca)
        } else if c <= m && m <= a {
            Some(Regime::Cma)
        } else {
            None
        }
    }

    /// Conventional regime number, 1 through 6.
    pub fn number(self) -> u8 {
        match self {
            Regime::Amc => 1,
            Regime::Mac => 2,
            Regime::Acm => 3,
            Regime::Cam => 4,
            Regime::Mca => 5,
            Regime::Cma => 6,
        }
    }

    pub fn is_fast_cooling(self) -> bool {
        matches!(self, Regime::Acm | Regime::Cam | Regime::Cma)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Amc => "I",
            Regime::Mac => "II",
            Regime::Acm => "III",
            Regime::Cam => "IV",
            Regime::Mca => "V",
            Regime::Cma => "VI",
        };
        f.write_str(name)
    }
}
