//! Inverse FPS-decay model.
//!
//! Mean FPS across camera configurations is modelled as
//!
//! ```text
//! y(x) = a / x² + b / x
//! ```
//!
//! where `x` is the number of cameras analysed. The fitter relies on two
//! primitive operations, both implemented here:
//! - predict `y(x)` for given parameters (residuals, plots)
//! - fill a Jacobian row `∂y/∂(a, b)` at `x` (Levenberg–Marquardt steps)

/// Number of free parameters (`a`, `b`).
pub const PARAM_LEN: usize = 2;

/// Predict `y(x)`.
pub fn predict(x: f64, a: f64, b: f64) -> f64 {
    a / (x * x) + b / x
}

/// Fill the Jacobian row `[∂y/∂a, ∂y/∂b] = [1/x², 1/x]`.
///
/// # Panics
/// Panics if `out` is shorter than [`PARAM_LEN`].
pub fn fill_jacobian_row(x: f64, out: &mut [f64]) {
    out[0] = 1.0 / (x * x);
    out[1] = 1.0 / x;
}

/// Sample the fitted curve at `n` evenly spaced points over `[x_min, x_max]`.
pub fn sample_curve(a: f64, b: f64, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    crate::math::linspace(x_min, x_max, n)
        .into_iter()
        .map(|x| (x, predict(x, a, b)))
        .collect()
}
