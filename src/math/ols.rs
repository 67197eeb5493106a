//! Least squares solvers.
//!
//! The curve fit solves one small linear problem per Levenberg–Marquardt step:
//!
//! ```text
//! minimize ‖J δ - r‖² + λ ‖D δ‖²
//! ```
//!
//! where `J` is the model Jacobian, `r` the residual vector and `D` the
//! diagonal scaling `sqrt(diag(JᵀJ))`. Stacking `J` on top of `sqrt(λ)·D`
//! turns the damped problem into an ordinary (tall) least squares problem,
//! which we solve with SVD rather than by forming the normal equations.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve one damped (Levenberg–Marquardt) step.
///
/// `lambda = 0` reduces to a plain Gauss–Newton step.
pub fn solve_damped_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let (n, p) = jacobian.shape();
    if residuals.len() != n {
        return None;
    }

    let mut stacked = DMatrix::<f64>::zeros(n + p, p);
    stacked.rows_mut(0, n).copy_from(jacobian);

    let scale = lambda.max(0.0).sqrt();
    for j in 0..p {
        // Marquardt scaling; fall back to unit scaling for all-zero columns.
        let col_norm = jacobian.column(j).norm();
        let d = if col_norm > 0.0 { col_norm } else { 1.0 };
        stacked[(n + j, j)] = scale * d;
    }

    let mut rhs = DVector::<f64>::zeros(n + p);
    rhs.rows_mut(0, n).copy_from(residuals);

    solve_least_squares(&stacked, &rhs)
}
