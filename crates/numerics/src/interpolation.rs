//! Piecewise-linear interpolation over tabulated samples.
//!
//! All variants share one routine parameterised by [`Scale`] (linear or
//! log-log) and [`Extrapolation`] (which side, if any, continues the edge
//! segment instead of clamping to the edge value). Abscissae must be
//! ascending.

use crate::error::{NumericsError, Result};

/// Space in which the straight-line segments are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    /// Straight lines in `(ln x, ln y)`.
    Log,
}

/// Behaviour outside `[x[0], x[n-1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolation {
    /// Return the nearest edge value on both sides.
    Clamp,
    /// Extend the first segment below `x[0]`, clamp above.
    Low,
    /// Extend the last segment above `x[n-1]`, clamp below.
    High,
    Both,
}

impl Extrapolation {
    fn extends_low(self) -> bool {
        matches!(self, Self::Low | Self::Both)
    }

    fn extends_high(self) -> bool {
        matches!(self, Self::High | Self::Both)
    }
}

/// Evaluate the segment through `(x0, y0)` and `(x1, y1)` at `xi`.
///
/// In log space a segment touching a non-positive ordinate has no log-log
/// line; it falls back to linear between the points and to zero outside.
fn segment(xi: f64, x0: f64, x1: f64, y0: f64, y1: f64, scale: Scale) -> f64 {
    match scale {
        Scale::Linear => y0 + (y1 - y0) / (x1 - x0) * (xi - x0),
        Scale::Log => {
            if y0 > 0.0 && y1 > 0.0 && x0 > 0.0 && x1 > 0.0 && xi > 0.0 {
                let slope = (y1 / y0).ln() / (x1 / x0).ln();
                y0 * (slope * (xi / x0).ln()).exp()
            } else if (x0..=x1).contains(&xi) {
                y0 + (y1 - y0) / (x1 - x0) * (xi - x0)
            } else {
                0.0
            }
        }
    }
}

/// Core lookup used by every named variant.
///
/// An empty table or a NaN abscissa yields NaN and a single sample yields
/// that sample.
pub fn interpolate(xi: f64, x: &[f64], y: &[f64], scale: Scale, extra: Extrapolation) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 || xi.is_nan() {
        return f64::NAN;
    }
    if n == 1 {
        return y[0];
    }

    if xi < x[0] {
        return if extra.extends_low() {
            segment(xi, x[0], x[1], y[0], y[1], scale)
        } else {
            y[0]
        };
    }
    if xi > x[n - 1] {
        return if extra.extends_high() {
            segment(xi, x[n - 2], x[n - 1], y[n - 2], y[n - 1], scale)
        } else {
            y[n - 1]
        };
    }

    // First index with x[i] >= xi.
    let i = x[..n].partition_point(|&v| v < xi);
    if x[i] == xi {
        return y[i];
    }
    segment(xi, x[i - 1], x[i], y[i - 1], y[i], scale)
}

pub fn interp(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Linear, Extrapolation::Clamp)
}

pub fn interp_extra_lo(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Linear, Extrapolation::Low)
}

pub fn interp_extra_hi(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Linear, Extrapolation::High)
}

pub fn interp_extra_both(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Linear, Extrapolation::Both)
}

pub fn interp_log(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Log, Extrapolation::Clamp)
}

pub fn interp_log_extra_lo(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Log, Extrapolation::Low)
}

pub fn interp_log_extra_hi(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Log, Extrapolation::High)
}

pub fn interp_log_extra_both(xi: f64, x: &[f64], y: &[f64]) -> f64 {
    interpolate(xi, x, y, Scale::Log, Extrapolation::Both)
}

/// Validated table for repeated lookups.
#[derive(Debug, Clone)]
pub struct Interpolator<'a> {
    x: &'a [f64],
    y: &'a [f64],
    scale: Scale,
    extra: Extrapolation,
}

impl<'a> Interpolator<'a> {
    /// Checks equal lengths, at least two samples and ascending abscissae.
    pub fn new(x: &'a [f64], y: &'a [f64], scale: Scale, extra: Extrapolation) -> Result<Self> {
        if x.len() != y.len() {
            return Err(NumericsError::invalid_input(format!(
                "abscissa/ordinate length mismatch: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(NumericsError::invalid_input(
                "interpolation needs at least 2 samples",
            ));
        }
        if x.windows(2).any(|w| !(w[1] >= w[0])) {
            return Err(NumericsError::invalid_input("abscissae must be ascending"));
        }
        if scale == Scale::Log && x[0] <= 0.0 {
            return Err(NumericsError::invalid_input(
                "log interpolation needs positive abscissae",
            ));
        }
        Ok(Self { x, y, scale, extra })
    }

    pub fn eval(&self, xi: f64) -> f64 {
        interpolate(xi, self.x, self.y, self.scale, self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: [f64; 3] = [1.0, 2.0, 4.0];
    const Y: [f64; 3] = [10.0, 20.0, 40.0];

    #[test]
    fn test_interp_hits_samples() {
        for (xi, yi) in X.iter().zip(Y.iter()) {
            assert_eq!(interp(*xi, &X, &Y), *yi);
            assert_eq!(interp_log(*xi, &X, &Y), *yi);
        }
    }

    #[test]
    fn test_interp_clamps() {
        assert_eq!(interp(0.5, &X, &Y), 10.0);
        assert_eq!(interp(5.0, &X, &Y), 40.0);
        assert_eq!(interp_log(0.5, &X, &Y), 10.0);
        assert_eq!(interp_log(5.0, &X, &Y), 40.0);
    }

    #[test]
    fn test_linear_extrapolation() {
        assert!((interp_extra_lo(0.0, &X, &Y) - 0.0).abs() < 1e-12);
        assert_eq!(interp_extra_lo(5.0, &X, &Y), 40.0);
        assert!((interp_extra_hi(6.0, &X, &Y) - 60.0).abs() < 1e-12);
        assert_eq!(interp_extra_hi(0.0, &X, &Y), 10.0);
        assert!((interp_extra_both(0.0, &X, &Y)).abs() < 1e-12);
        assert!((interp_extra_both(6.0, &X, &Y) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_extrapolation_follows_power_law() {
        let x = [1.0, 10.0, 100.0];
        let y = [1.0, 0.01, 1e-4];
        // y = x^-2
        assert!((interp_log_extra_hi(1000.0, &x, &y) / 1e-6 - 1.0).abs() < 1e-10);
        assert!((interp_log_extra_lo(0.1, &x, &y) / 100.0 - 1.0).abs() < 1e-10);
        assert!((interp_log_extra_both(0.1, &x, &y) / 100.0 - 1.0).abs() < 1e-10);
        assert!((interp_log(31.6227766, &x, &y) / 1e-3 - 1.0).abs() < 1e-6);
        assert_eq!(interp_log_extra_lo(1000.0, &x, &y), 1e-4);
        assert_eq!(interp_log_extra_hi(0.1, &x, &y), 1.0);
    }

    #[test]
    fn test_log_with_zero_ordinate() {
        let x = [1.0, 2.0, 3.0];
        let y = [0.0, 2.0, 4.0];
        assert!((interp_log(1.5, &x, &y) - 1.0).abs() < 1e-12);
        assert_eq!(interp_log_extra_lo(0.5, &x, &y), 0.0);
    }

    #[test]
    fn test_degenerate_tables() {
        assert!(interp(1.0, &[], &[]).is_nan());
        assert_eq!(interp(5.0, &[1.0], &[3.0]), 3.0);
    }

    #[test]
    fn test_nan_abscissa_yields_nan() {
        let x = [1.0, 10.0, 100.0];
        let y = [2.0, 20.0, 200.0];
        for scale in [Scale::Linear, Scale::Log] {
            for extra in [
                Extrapolation::Clamp,
                Extrapolation::Low,
                Extrapolation::High,
                Extrapolation::Both,
            ] {
                assert!(interpolate(f64::NAN, &x, &y, scale, extra).is_nan());
            }
        }
    }

    #[test]
    fn test_interpolator_validation() {
        assert!(Interpolator::new(&X, &Y[..2], Scale::Linear, Extrapolation::Clamp).is_err());
        assert!(Interpolator::new(&[2.0, 1.0], &[1.0, 1.0], Scale::Linear, Extrapolation::Clamp).is_err());
        assert!(Interpolator::new(&[0.0, 1.0], &[1.0, 1.0], Scale::Log, Extrapolation::Clamp).is_err());
        let table = Interpolator::new(&X, &Y, Scale::Linear, Extrapolation::Both).unwrap();
        assert!((table.eval(3.0) - 30.0).abs() < 1e-12);
    }
}
