//! Shared test utilities for the afterglow workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate floating-point assertions (absolute, relative, log-slope)
//! - Canonical run parameters
//! - Synthetic profile generators
//! - Workspace path helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_rel_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for relative floating-point equality, `|l - r| <= tol * max(|l|, |r|)`.
///
/// Quantities in this workspace span tens of decades, so most physics
/// assertions are relative.
///
/// ```ignore
/// use test_utils::assert_rel_eq;
///
/// assert_rel_eq!(1.0e30, 1.0001e30, 1e-3); // passes
/// ```
#[macro_export]
macro_rules! assert_rel_eq {
    ($left:expr, $right:expr, $tol:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let tol: f64 = $tol as f64;
        let scale = left.abs().max(right.abs());
        let diff = (left - right).abs();
        if !(diff <= tol * scale) {
            panic!(
                "assertion failed: `(left ≈ right)` (relative)\n  left: `{:?}`,\n right: `{:?}`,\n  rel diff: `{:?}` > tol `{:?}`",
                left,
                right,
                if scale > 0.0 { diff / scale } else { diff },
                tol
            );
        }
    }};
}

/// Macro asserting the log-log slope between two points lies in a range.
///
/// ```ignore
/// use test_utils::assert_log_slope;
///
/// assert_log_slope!((1.0, 1.0), (10.0, 100.0), 1.9..=2.1);
/// ```
#[macro_export]
macro_rules! assert_log_slope {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $range:expr) => {{
        let slope = $crate::log_slope(($x1, $y1), ($x2, $y2));
        let range = $range;
        if !range.contains(&slope) {
            panic!(
                "assertion failed: log slope `{:?}` not in `{:?}`",
                slope, range
            );
        }
    }};
}

/// Log-log slope between two positive points.
pub fn log_slope((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    (y2 / y1).ln() / (x2 / x1).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_rel_eq_passes() {
        assert_rel_eq!(1.0e30, 1.0001e30, 1e-3);
        assert_rel_eq!(0.0, 0.0, 1e-12);
    }

    #[test]
    #[should_panic(expected = "relative")]
    fn test_assert_rel_eq_fails() {
        assert_rel_eq!(1.0e-30, 2.0e-30, 1e-3);
    }

    #[test]
    #[should_panic(expected = "relative")]
    fn test_assert_rel_eq_rejects_nan() {
        assert_rel_eq!(f64::NAN, 1.0, 1e-3);
    }

    #[test]
    fn test_assert_log_slope() {
        assert_log_slope!((1.0, 1.0), (10.0, 100.0), 1.9..=2.1);
        assert_log_slope!((1.0, 8.0), (2.0, 1.0), -3.01..=-2.99);
    }
}
