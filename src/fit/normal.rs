//! Maximum-likelihood normal fit over FPS samples.
//!
//! The MLE of a Gaussian is the sample mean and the *population* standard
//! deviation (divisor `n`, not `n - 1`).

use statrs::distribution::{Continuous, Normal};

use crate::domain::NormalFit;
use crate::error::AppError;
use crate::math::{linspace, mean, population_std_dev};

/// Fit `mu` and `sigma` to the samples.
pub fn fit_normal(samples: &[f64]) -> Result<NormalFit, AppError> {
    if samples.iter().any(|v| !v.is_finite()) {
        return Err(AppError::fit("FPS samples must be finite to fit a normal distribution."));
    }
    let mu = mean(samples)
        .ok_or_else(|| AppError::fit("Cannot fit a normal distribution to zero samples."))?;
    let sigma = population_std_dev(samples).unwrap_or(0.0);
    Ok(NormalFit { mu, sigma })
}

/// Sample the fitted PDF at `n` points over `[x_min, x_max]`.
///
/// Returns `None` for a degenerate fit (`sigma == 0`), which has no density.
pub fn pdf_curve(fit: &NormalFit, x_min: f64, x_max: f64, n: usize) -> Option<Vec<(f64, f64)>> {
    let dist = Normal::new(fit.mu, fit.sigma).ok()?;
    if fit.sigma <= 0.0 {
        return None;
    }
    Some(
        linspace(x_min, x_max, n)
            .into_iter()
            .map(|x| (x, dist.pdf(x)))
            .collect(),
    )
}
