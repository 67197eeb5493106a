//! Synthetic FPS sample generation.
//!
//! Produces logs shaped like the capture program's output so the plotting
//! commands can be exercised without a camera rig.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::error::AppError;

/// Upper bound (exclusive) on FPS values the capture program records.
const CAPTURE_FPS_MAX: f64 = 3000.0;

/// Parameters for a synthetic FPS log.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub seed: u64,
    /// Truncate to whole frames per second and drop values outside `(0, 3000)`.
    pub round: bool,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            count: 10_000,
            mean: 30.0,
            std_dev: 2.0,
            seed: 42,
            round: false,
        }
    }
}

/// Draw `spec.count` samples from `Normal(mean, std_dev)`.
///
/// With `round`, the output may be shorter than `count` because out-of-range
/// values are dropped the same way the capture program drops them.
pub fn generate_fps_samples(spec: &SampleSpec) -> Result<Vec<f64>, AppError> {
    if spec.count == 0 {
        return Err(AppError::usage("Sample count must be > 0."));
    }
    // rand_distr accepts a negative sigma.
    if !(spec.std_dev >= 0.0 && spec.std_dev.is_finite()) {
        return Err(AppError::usage(format!(
            "Standard deviation must be finite and >= 0, got {}.",
            spec.std_dev
        )));
    }
    let normal = Normal::new(spec.mean, spec.std_dev)
        .map_err(|e| AppError::usage(format!("Invalid sample distribution: {e}")))?;

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let samples = (0..spec.count).map(|_| normal.sample(&mut rng));

    let out: Vec<f64> = if spec.round {
        samples
            .map(f64::trunc)
            .filter(|&v| v > 0.0 && v < CAPTURE_FPS_MAX)
            .collect()
    } else {
        samples.collect()
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_samples() {
        let spec = SampleSpec { count: 100, ..SampleSpec::default() };
        assert_eq!(generate_fps_samples(&spec).unwrap(), generate_fps_samples(&spec).unwrap());
    }

    #[test]
    fn rounded_samples_are_whole_and_in_range() {
        let spec = SampleSpec {
            count: 1000,
            mean: 2.0,
            std_dev: 3.0,
            round: true,
            ..SampleSpec::default()
        };
        let samples = generate_fps_samples(&spec).unwrap();
        assert!(samples.len() < 1000);
        assert!(samples.iter().all(|v| v.fract() == 0.0 && *v > 0.0 && *v < 3000.0));
    }

    #[test]
    fn invalid_specs_are_rejected() {
        let zero = SampleSpec { count: 0, ..SampleSpec::default() };
        assert!(generate_fps_samples(&zero).is_err());
        let negative = SampleSpec { std_dev: -1.0, ..SampleSpec::default() };
        let err = generate_fps_samples(&negative).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
        let nan = SampleSpec { std_dev: f64::NAN, ..SampleSpec::default() };
        assert!(generate_fps_samples(&nan).is_err());
    }
}
