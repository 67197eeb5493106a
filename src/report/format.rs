//! Terminal and legend text.
//!
//! Formatting lives in one place so the fitting code stays free of output
//! concerns and tests can pin the exact strings.

use crate::domain::{InverseFit, NormalFit};

/// The fitted model as printed to stdout: `y = <a>/x^2 + <b>/x`.
pub fn format_fit_equation(fit: &InverseFit) -> String {
    format!("y = {:.5}/x^2 + {:.5}/x", fit.a, fit.b)
}

/// Legend lines for the fitted normal PDF: `μ` first, then `σ`.
pub fn format_normal_labels(fit: &NormalFit) -> [String; 2] {
    [format!("μ = {:.2}", fit.mu), format!("σ = {:.2}", fit.sigma)]
}

/// Multi-line summary of the per-configuration means (logged at info level).
pub fn format_means_table(configs: &[f64], means: &[f64]) -> String {
    let mut out = String::from("config  mean_fps\n");
    for (x, m) in configs.iter().zip(means.iter()) {
        out.push_str(&format!("{x:>6.0}  {m:>8.3}\n"));
    }
    out
}
