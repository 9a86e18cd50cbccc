//! Dormand–Prince 5(4) stepper with continuous output.
//!
//! The stepper advances an [`OdeSystem`] one accepted step at a time and
//! keeps the Hairer continuous-extension coefficients of the last step, so
//! the state can be evaluated anywhere inside that step without restarting
//! the integration. Integration runs toward increasing `x` only.

use crate::error::{NumericsError, Result};
use nalgebra::SVector;
use tracing::trace;

/// Right-hand side of `dy/dx = f(x, y)` with an `N`-component state.
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, x: f64, y: &SVector<f64, N>) -> SVector<f64, N>;
}

/// Error tolerances for step-size control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerances {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }

    /// Pure relative control, `atol = 0`.
    pub fn relative(rtol: f64) -> Self {
        Self { atol: 0.0, rtol }
    }
}

// Nodes
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// Stage coefficients
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// Error estimate (5th minus embedded 4th order)
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Continuous extension
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Adaptive Dormand–Prince stepper with dense output.
#[derive(Debug, Clone)]
pub struct DenseStepper<const N: usize> {
    tol: Tolerances,
    x: f64,
    y: SVector<f64, N>,
    dydx: SVector<f64, N>,
    h: f64,
    x_old: f64,
    h_old: f64,
    rcont: [SVector<f64, N>; 5],
    steps: usize,
    rejected: usize,
}

impl<const N: usize> DenseStepper<N> {
    pub fn new(tol: Tolerances) -> Self {
        Self {
            tol,
            x: 0.0,
            y: SVector::zeros(),
            dydx: SVector::zeros(),
            h: 0.0,
            x_old: 0.0,
            h_old: 0.0,
            rcont: [SVector::zeros(); 5],
            steps: 0,
            rejected: 0,
        }
    }

    /// Reset to `y0` at `x0` with trial step `h0 > 0`.
    pub fn initialize<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        y0: SVector<f64, N>,
        x0: f64,
        h0: f64,
    ) -> Result<()> {
        if !(h0 > 0.0 && h0.is_finite()) {
            return Err(NumericsError::invalid_input(format!(
                "initial step must be positive and finite, got {}",
                h0
            )));
        }
        if !y0.iter().all(|v| v.is_finite()) || !x0.is_finite() {
            return Err(NumericsError::NonFiniteState { x: x0 });
        }
        let dydx = sys.rhs(x0, &y0);
        if !dydx.iter().all(|v| v.is_finite()) {
            return Err(NumericsError::NonFiniteState { x: x0 });
        }
        self.x = x0;
        self.y = y0;
        self.dydx = dydx;
        self.h = h0;
        self.x_old = x0;
        self.h_old = 0.0;
        self.rcont = [y0, SVector::zeros(), SVector::zeros(), SVector::zeros(), SVector::zeros()];
        self.steps = 0;
        self.rejected = 0;
        Ok(())
    }

    pub fn current_x(&self) -> f64 {
        self.x
    }

    pub fn current_state(&self) -> &SVector<f64, N> {
        &self.y
    }

    /// Accepted and rejected step counts since the last `initialize`.
    pub fn stats(&self) -> (usize, usize) {
        (self.steps, self.rejected)
    }

    fn error_norm(&self, y_new: &SVector<f64, N>, err: &SVector<f64, N>) -> f64 {
        let mut sum = 0.0;
        let mut counted = 0usize;
        for i in 0..N {
            let sk = self.tol.atol + self.tol.rtol * self.y[i].abs().max(y_new[i].abs());
            // Components identically zero under pure relative control carry no scale.
            if sk > 0.0 {
                let ratio = err[i] / sk;
                sum += ratio * ratio;
                counted += 1;
            } else if err[i] != 0.0 {
                return f64::INFINITY;
            }
        }
        if counted == 0 {
            0.0
        } else {
            (sum / counted as f64).sqrt()
        }
    }

    /// Take one accepted step, shrinking and retrying as needed.
    pub fn do_step<S: OdeSystem<N>>(&mut self, sys: &S) -> Result<()> {
        let x = self.x;
        let y = self.y;
        let k1 = self.dydx;
        let mut h = self.h;
        let mut last_rejected = false;

        loop {
            if h <= f64::EPSILON * x.abs().max(1.0) * 16.0 || !h.is_finite() {
                return Err(NumericsError::StepSizeUnderflow { x, h });
            }

            let k2 = sys.rhs(x + C2 * h, &(y + k1 * (h * A21)));
            let k3 = sys.rhs(x + C3 * h, &(y + (k1 * A31 + k2 * A32) * h));
            let k4 = sys.rhs(x + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
            let k5 = sys.rhs(
                x + C5 * h,
                &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
            );
            let k6 = sys.rhs(
                x + h,
                &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
            );
            let y_new = y + (k1 * A71 + k3 * A73 + k4 * A74 + k5 * A75 + k6 * A76) * h;
            let k7 = sys.rhs(x + h, &y_new);

            let finite = y_new.iter().chain(k7.iter()).all(|v| v.is_finite());
            let err_est = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
            let err = if finite {
                self.error_norm(&y_new, &err_est)
            } else {
                f64::INFINITY
            };

            if err <= 1.0 {
                let ydiff = y_new - y;
                let bspl = k1 * h - ydiff;
                self.rcont = [
                    y,
                    ydiff,
                    bspl,
                    ydiff - k7 * h - bspl,
                    (k1 * D1 + k3 * D3 + k4 * D4 + k5 * D5 + k6 * D6 + k7 * D7) * h,
                ];

                let mut factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                if last_rejected {
                    factor = factor.min(1.0);
                }

                self.x_old = x;
                self.h_old = h;
                self.x = x + h;
                self.y = y_new;
                self.dydx = k7;
                self.h = h * factor;
                self.steps += 1;
                return Ok(());
            }

            self.rejected += 1;
            last_rejected = true;
            let factor = if err.is_finite() {
                (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
            } else {
                MIN_FACTOR
            };
            trace!(x = x, h = h, err = err, "step rejected");
            h *= factor;

            if !finite && h <= f64::EPSILON * x.abs().max(1.0) * 16.0 {
                return Err(NumericsError::NonFiniteState { x });
            }
        }
    }

    /// Evaluate the state at `x` inside the last accepted step.
    pub fn calc_state(&self, x: f64) -> Result<SVector<f64, N>> {
        if self.h_old == 0.0 {
            return if x == self.x {
                Ok(self.y)
            } else {
                Err(NumericsError::invalid_input(format!(
                    "no step taken yet, cannot evaluate at {}",
                    x
                )))
            };
        }
        let slack = 1e-12 * self.h_old;
        if x < self.x_old - slack || x > self.x + slack {
            return Err(NumericsError::invalid_input(format!(
                "dense output requested at {} outside last step [{}, {}]",
                x, self.x_old, self.x
            )));
        }
        let s = (x - self.x_old) / self.h_old;
        let s1 = 1.0 - s;
        let [r1, r2, r3, r4, r5] = &self.rcont;
        Ok(r1 + (r2 + (r3 + (r4 + r5 * s1) * s) * s1) * s)
    }
}

/// Integrate from the stepper's current position and sample the solution at
/// every `xs` (ascending, none below the current position).
pub fn sample_dense<S, const N: usize>(
    stepper: &mut DenseStepper<N>,
    sys: &S,
    xs: &[f64],
) -> Result<Vec<SVector<f64, N>>>
where
    S: OdeSystem<N>,
{
    let mut out = Vec::with_capacity(xs.len());
    for &x in xs {
        let behind = if stepper.h_old > 0.0 {
            x < stepper.x_old
        } else {
            x < stepper.x
        };
        if behind {
            return Err(NumericsError::invalid_input(format!(
                "sample point {} lies behind the integration front",
                x
            )));
        }
        while stepper.current_x() < x {
            stepper.do_step(sys)?;
        }
        out.push(stepper.calc_state(x)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    struct Decay;

    impl OdeSystem<1> for Decay {
        fn rhs(&self, _x: f64, y: &SVector<f64, 1>) -> SVector<f64, 1> {
            -*y
        }
    }

    struct Oscillator;

    impl OdeSystem<2> for Oscillator {
        fn rhs(&self, _x: f64, y: &Vector2<f64>) -> Vector2<f64> {
            Vector2::new(y[1], -y[0])
        }
    }

    #[test]
    fn test_exponential_decay_steps() {
        let mut stepper = DenseStepper::<1>::new(Tolerances::relative(1e-10));
        stepper
            .initialize(&Decay, SVector::from([1.0]), 0.0, 1e-3)
            .unwrap();
        while stepper.current_x() < 5.0 {
            stepper.do_step(&Decay).unwrap();
        }
        let x = stepper.current_x();
        let y = stepper.current_state()[0];
        assert!((y / (-x).exp() - 1.0).abs() < 1e-8, "y = {} at x = {}", y, x);
    }

    #[test]
    fn test_dense_output_matches_analytic() {
        let mut stepper = DenseStepper::<2>::new(Tolerances::relative(1e-9));
        stepper
            .initialize(&Oscillator, Vector2::new(0.0, 1.0), 0.0, 1e-3)
            .unwrap();
        let xs: Vec<f64> = (0..=100).map(|i| i as f64 * 0.1).collect();
        let ys = sample_dense(&mut stepper, &Oscillator, &xs).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((y[0] - x.sin()).abs() < 1e-6, "x = {}: {} vs {}", x, y[0], x.sin());
            assert!((y[1] - x.cos()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_calc_state_endpoints() {
        let mut stepper = DenseStepper::<1>::new(Tolerances::relative(1e-9));
        stepper
            .initialize(&Decay, SVector::from([2.0]), 1.0, 0.1)
            .unwrap();
        assert_eq!(stepper.calc_state(1.0).unwrap()[0], 2.0);
        assert!(stepper.calc_state(1.5).is_err());
        stepper.do_step(&Decay).unwrap();
        let x = stepper.current_x();
        assert!((stepper.calc_state(x).unwrap()[0] - stepper.current_state()[0]).abs() < 1e-14);
        assert!((stepper.calc_state(1.0).unwrap()[0] - 2.0).abs() < 1e-14);
        assert!(stepper.calc_state(x + 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_initial_step() {
        let mut stepper = DenseStepper::<1>::new(Tolerances::relative(1e-9));
        assert!(stepper
            .initialize(&Decay, SVector::from([1.0]), 0.0, 0.0)
            .is_err());
        assert!(stepper
            .initialize(&Decay, SVector::from([f64::NAN]), 0.0, 0.1)
            .is_err());
    }

    struct BlowUp;

    impl OdeSystem<1> for BlowUp {
        fn rhs(&self, _x: f64, y: &SVector<f64, 1>) -> SVector<f64, 1> {
            // y' = y^2 with y(0) = 1 diverges at x = 1
            y.component_mul(y)
        }
    }

    #[test]
    fn test_finite_time_blowup_errors() {
        let mut stepper = DenseStepper::<1>::new(Tolerances::relative(1e-9));
        stepper
            .initialize(&BlowUp, SVector::from([1.0]), 0.0, 1e-3)
            .unwrap();
        let mut result = Ok(());
        for _ in 0..100_000 {
            result = stepper.do_step(&BlowUp);
            if result.is_err() || stepper.current_x() > 2.0 {
                break;
            }
        }
        assert!(result.is_err(), "integration should fail before x = 1");
        assert!(stepper.current_x() < 1.0);
    }
}
