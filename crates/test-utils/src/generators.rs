//! Synthetic data generators for afterglow tests.
//!
//! These generators create predictable profiles with known analytic slopes,
//! plus seeded random samplers for property-style checks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Geometrically spaced samples over `[lo, hi]`, inclusive.
///
/// # Example
///
/// ```
/// use test_utils::log_samples;
///
/// let x = log_samples(1.0, 100.0, 3);
/// assert_eq!(x.len(), 3);
/// assert!((x[1] - 10.0).abs() < 1e-9);
/// ```
pub fn log_samples(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    assert!(n >= 2 && lo > 0.0 && hi > lo);
    let step = (hi / lo).ln() / (n - 1) as f64;
    (0..n).map(|i| lo * (step * i as f64).exp()).collect()
}

/// `amp * x^index` sampled at every `x`.
pub fn power_law(x: &[f64], amp: f64, index: f64) -> Vec<f64> {
    x.iter().map(|&v| amp * v.powf(index)).collect()
}

/// Lorentz factor profile of a coasting shell that decelerates as
/// `r^-3/2` past `r_dec`, floored at 1.
pub fn coasting_then_decelerating(r: &[f64], gamma0: f64, r_dec: f64) -> Vec<f64> {
    r.iter()
        .map(|&x| {
            if x <= r_dec {
                gamma0
            } else {
                (gamma0 * (x / r_dec).powf(-1.5)).max(1.0)
            }
        })
        .collect()
}

/// Seeded RNG so failures are reproducible.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Log-uniform random value in `[lo, hi]`.
pub fn random_log_uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    (rng.gen_range(lo.ln()..=hi.ln())).exp()
}

/// Random distinct triple `(gamma_a, gamma_c, gamma_m)` spread over
/// `[1, 1e8]`, ties excluded.
pub fn random_breaks<R: Rng>(rng: &mut R) -> (f64, f64, f64) {
    loop {
        let a = random_log_uniform(rng, 1.0, 1e8);
        let c = random_log_uniform(rng, 1.0, 1e8);
        let m = random_log_uniform(rng, 1.0, 1e8);
        if a != c && c != m && a != m {
            return (a, c, m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_law_slope() {
        let x = log_samples(1.0, 1e4, 5);
        let y = power_law(&x, 2.0, -1.5);
        let slope = (y[4] / y[0]).ln() / (x[4] / x[0]).ln();
        assert!((slope + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_coasting_profile() {
        let r = log_samples(1e15, 1e19, 50);
        let g = coasting_then_decelerating(&r, 300.0, 1e17);
        assert_eq!(g[0], 300.0);
        assert!(g.windows(2).all(|w| w[1] <= w[0]));
        assert!(g.iter().all(|&v| v >= 1.0));
    }

    #[test]
    fn test_random_breaks_are_seeded() {
        let a = random_breaks(&mut seeded_rng(7));
        let b = random_breaks(&mut seeded_rng(7));
        assert_eq!(a, b);
    }
}
