//! Descriptive statistics over FPS samples.

use statrs::statistics::Statistics;

use crate::domain::Histogram;

/// Sturges' rule coefficient (≈ 1 / log10(2)), applied to a natural log.
const STURGES_COEFF: f64 = 3.322;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::mean(values))
}

/// Population standard deviation (divisor `n`), `None` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.population_std_dev())
}

/// Histogram bin count by Sturges' rule: `floor(1 + 3.322·ln(n))`, at least 1.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let bins = (1.0 + STURGES_COEFF * (n as f64).ln()).floor();
    (bins as usize).max(1)
}

/// `n` evenly spaced values over `[start, end]` (inclusive).
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Build a density-normalized histogram with `bins` equal-width bins over the
/// sample range.
///
/// Bins are half-open `[left, right)` except the last, which includes the
/// maximum. A zero-width range is widened to `[v - 0.5, v + 0.5]`.
pub fn density_histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }

    let edges = linspace(lo, hi, bins + 1);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    let densities = counts.iter().map(|&c| c as f64 / (n * width)).collect();

    Some(Histogram { edges, densities })
}
