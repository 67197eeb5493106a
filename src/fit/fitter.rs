//! Levenberg–Marquardt fit of the inverse FPS-decay model.
//!
//! Given camera counts `x_i` and observed mean FPS `y_i`, we minimize
//!
//! ```text
//! Σ (y_i - (a/x_i² + b/x_i))²
//! ```
//!
//! starting from `a = b = 1`. Each iteration solves a damped linear problem
//! (see `math::ols`) and adapts the damping factor λ: an accepted step divides
//! it by 10, a rejected step multiplies it by 10.
//!
//! The iteration stops when either:
//! - the relative reduction of the SSE drops below `ftol`
//! - the step becomes small relative to the parameters (`xtol`)
//!
//! Running out of iterations is reported as an error.

use nalgebra::{DMatrix, DVector};

use crate::domain::InverseFit;
use crate::error::AppError;
use crate::math::solve_damped_step;
use crate::models::{PARAM_LEN, fill_jacobian_row, predict};

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;

/// Options controlling the Levenberg–Marquardt iteration.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Starting values for `(a, b)`.
    pub initial: [f64; PARAM_LEN],
    /// Maximum number of iterations (accepted + rejected steps).
    pub max_iterations: usize,
    /// Relative SSE reduction below which we stop.
    pub ftol: f64,
    /// Relative step size below which we stop.
    pub xtol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            initial: [1.0, 1.0],
            max_iterations: 200 * (PARAM_LEN + 1),
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
        }
    }
}

/// Fit `y = a/x² + b/x` to `(xs, ys)`.
pub fn fit_inverse_model(
    xs: &[f64],
    ys: &[f64],
    opts: &FitOptions,
) -> Result<InverseFit, AppError> {
    if xs.len() != ys.len() {
        return Err(AppError::fit(format!(
            "Mismatched fit input: {} x values but {} y values.",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < PARAM_LEN {
        return Err(AppError::fit(format!(
            "Need at least {PARAM_LEN} points to fit 2 parameters, got {}.",
            xs.len()
        )));
    }
    if xs.iter().any(|&x| !x.is_finite() || x == 0.0) {
        return Err(AppError::fit("Model is undefined at x = 0 or non-finite x."));
    }
    if ys.iter().any(|y| !y.is_finite()) {
        return Err(AppError::fit("Observed values must be finite."));
    }

    let n = xs.len();
    let mut jacobian = DMatrix::<f64>::zeros(n, PARAM_LEN);
    let mut row = [0.0; PARAM_LEN];
    for (i, &x) in xs.iter().enumerate() {
        fill_jacobian_row(x, &mut row);
        for (j, &v) in row.iter().enumerate() {
            jacobian[(i, j)] = v;
        }
    }

    let mut params = DVector::from_row_slice(&opts.initial);
    let mut residuals = residual_vector(xs, ys, &params);
    let mut sse = residuals.norm_squared();
    let mut lambda = LAMBDA_INIT;

    for iteration in 1..=opts.max_iterations {
        let step = solve_damped_step(&jacobian, &residuals, lambda)
            .ok_or_else(|| AppError::fit("Singular Jacobian while fitting the FPS model."))?;

        let candidate = &params + &step;
        let candidate_residuals = residual_vector(xs, ys, &candidate);
        let candidate_sse = candidate_residuals.norm_squared();

        let step_small = step.norm() <= opts.xtol * (params.norm() + opts.xtol);

        if candidate_sse.is_finite() && candidate_sse <= sse {
            let reduction = (sse - candidate_sse) / sse.max(f64::MIN_POSITIVE);
            params = candidate;
            residuals = candidate_residuals;
            sse = candidate_sse;
            lambda = (lambda / 10.0).max(LAMBDA_MIN);

            log::debug!(
                "lm iter {iteration}: accepted a={:.6} b={:.6} sse={sse:.6e} lambda={lambda:.1e}",
                params[0],
                params[1]
            );

            if sse == 0.0 || reduction <= opts.ftol || step_small {
                return Ok(finish(&params, sse, iteration));
            }
        } else {
            log::debug!(
                "lm iter {iteration}: rejected sse={candidate_sse:.6e} lambda={lambda:.1e}"
            );

            // Nothing left to gain: the damped step no longer moves the parameters.
            if step_small {
                return Ok(finish(&params, sse, iteration));
            }
            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                break;
            }
        }
    }

    Err(AppError::fit(format!(
        "Optimal parameters not found: no convergence within {} iterations.",
        opts.max_iterations
    )))
}

fn finish(params: &DVector<f64>, sse: f64, iterations: usize) -> InverseFit {
    InverseFit {
        a: params[0],
        b: params[1],
        sse,
        iterations,
    }
}

fn residual_vector(xs: &[f64], ys: &[f64], params: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        xs.len(),
        xs.iter()
            .zip(ys.iter())
            .map(|(&x, &y)| y - predict(x, params[0], params[1])),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn recovers_noiseless_parameters() {
        let xs = configs(13);
        let ys: Vec<f64> = xs.iter().map(|&x| predict(x, 50.0, 30.0)).collect();

        let fit = fit_inverse_model(&xs, &ys, &FitOptions::default()).unwrap();
        assert!((fit.a - 50.0).abs() < 1e-6, "a = {}", fit.a);
        assert!((fit.b - 30.0).abs() < 1e-6, "b = {}", fit.b);
        assert!(fit.sse < 1e-12);
    }

    #[test]
    fn constant_means_reach_a_stationary_point() {
        // A constant cannot be represented exactly by a/x² + b/x; the fit must
        // still land on the least-squares optimum (zero gradient).
        let xs = configs(13);
        let ys = vec![30.0; 13];

        let fit = fit_inverse_model(&xs, &ys, &FitOptions::default()).unwrap();

        let (mut ga, mut gb) = (0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let r = y - predict(x, fit.a, fit.b);
            ga += r / (x * x);
            gb += r / x;
        }
        assert!(ga.abs() < 1e-4 && gb.abs() < 1e-4, "gradient = ({ga}, {gb})");

        // Model is linear in (a, b): compare with the direct solution.
        let j = DMatrix::from_fn(13, 2, |i, k| {
            if k == 0 {
                1.0 / (xs[i] * xs[i])
            } else {
                1.0 / xs[i]
            }
        });
        let direct = crate::math::solve_least_squares(&j, &DVector::from_row_slice(&ys)).unwrap();
        assert!((fit.a - direct[0]).abs() < 1e-4 * direct[0].abs());
        assert!((fit.b - direct[1]).abs() < 1e-4 * direct[1].abs());
    }

    #[test]
    fn decaying_means_fit_with_small_residual() {
        let xs = configs(13);
        let ys = [60.0, 35.0, 25.0, 19.0, 15.0, 13.0, 11.0, 10.0, 9.0, 8.0, 7.5, 7.0, 6.5];

        let fit = fit_inverse_model(&xs, &ys, &FitOptions::default()).unwrap();
        assert!(fit.b > 0.0);
        assert!(fit.sse < 5.0, "sse = {}", fit.sse);
        assert!(fit.iterations >= 1);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let opts = FitOptions::default();
        assert!(fit_inverse_model(&[1.0], &[2.0], &opts).is_err());
        assert!(fit_inverse_model(&[1.0, 2.0], &[2.0], &opts).is_err());
        assert!(fit_inverse_model(&[0.0, 2.0], &[2.0, 1.0], &opts).is_err());
        assert!(fit_inverse_model(&[1.0, 2.0], &[f64::NAN, 1.0], &opts).is_err());
    }

    #[test]
    fn iteration_limit_is_reported() {
        let xs = configs(13);
        let ys = vec![30.0; 13];
        let opts = FitOptions {
            max_iterations: 1,
            ftol: 0.0,
            xtol: 0.0,
            ..FitOptions::default()
        };

        let err = fit_inverse_model(&xs, &ys, &opts).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Fit);
        assert!(err.message().contains("Optimal parameters not found"));
    }
}
