//! Bracketed bisection.

use crate::error::{NumericsError, Result};

/// Default relative bracket width at which bisection stops.
pub const DEFAULT_BISECTION_TOL: f64 = 1e-6;

/// Halvings attempted before giving up.
pub const MAX_BISECTION_ITERATIONS: usize = 200;

/// Find a root of `f` in `[lo, hi]` by bisection.
///
/// Stops when the bracket width falls below `tol * max(|lo|, |hi|)` or `f`
/// hits exactly zero at a midpoint, and returns the bracket midpoint.
/// Fails with [`NumericsError::NoBracket`] if `f(lo)` and `f(hi)` share a
/// sign.
pub fn root_bisection<F>(f: F, lo: f64, hi: f64, tol: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(NumericsError::NoBracket { lo, hi, f_lo, f_hi });
    }

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= tol * lo.abs().max(hi.abs()) {
            return Ok(mid);
        }
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(NumericsError::NonConvergence {
        iterations: MAX_BISECTION_ITERATIONS,
        lo,
        hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_two() {
        let root = root_bisection(|x| x * x - 2.0, 0.0, 2.0, 1e-12).unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_reversed_bracket() {
        let root = root_bisection(|x| x - 3.0, 10.0, 0.0, 1e-9).unwrap();
        assert!((root - 3.0).abs() < 1e-7);
    }

    #[test]
    fn test_no_bracket() {
        let err = root_bisection(|x| x * x + 1.0, -1.0, 1.0, 1e-6).unwrap_err();
        assert!(matches!(err, NumericsError::NoBracket { .. }));
    }

    #[test]
    fn test_zero_tolerance_exhausts_budget() {
        // Bracket width never reaches 0 for an irrational root, so the
        // iteration budget is the only exit.
        let err = root_bisection(|x| x * x - 2.0, 1.0, 2.0, 0.0);
        match err {
            Err(NumericsError::NonConvergence { .. }) => {}
            Ok(root) => assert!((root - 2f64.sqrt()).abs() < 1e-15),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_endpoint_root() {
        assert_eq!(root_bisection(|x| x - 1.0, 1.0, 5.0, 1e-6).unwrap(), 1.0);
    }
}
