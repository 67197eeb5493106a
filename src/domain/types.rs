//! Shared domain types.
//!
//! These types are deliberately small: the tool only ever handles a column of
//! FPS samples, a handful of per-configuration means, and the parameters fitted
//! to them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of numbered CSV files (camera configurations) read by `fpsplot mean`.
pub const DEFAULT_CONFIG_COUNT: usize = 13;

/// Frame rate the capture program samples at, used to turn frame indices into seconds.
pub const DEFAULT_SAMPLE_RATE: f64 = 25.0;

/// Input file used when none is given on the command line.
pub const DEFAULT_INPUT: &str = "fps.csv";

/// One row of a pre-aggregated mean table (`camNum,fpsMean`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MeanRow {
    #[serde(rename = "camNum")]
    pub cam_num: f64,
    #[serde(rename = "fpsMean")]
    pub fps_mean: f64,
}

/// Parameters of the inverse FPS-decay model `y = a/x² + b/x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverseFit {
    pub a: f64,
    pub b: f64,
    /// Sum of squared residuals at the solution.
    pub sse: f64,
    /// Levenberg–Marquardt iterations taken.
    pub iterations: usize,
}

/// Maximum-likelihood normal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalFit {
    pub mu: f64,
    /// Population standard deviation (divisor `n`).
    pub sigma: f64,
}

/// Density-normalized histogram.
///
/// `edges.len() == densities.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub densities: Vec<f64>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.densities.len()
    }

    /// Iterate `(left, right, density)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.densities.iter())
            .map(|(w, &d)| (w[0], w[1], d))
    }
}

/// X axis used by the FPS-over-frames plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAxis {
    /// Raw frame index (0-based).
    Frame,
    /// Elapsed seconds, assuming a fixed sampling rate.
    Seconds { sample_rate: f64 },
}

impl FrameAxis {
    pub fn x_value(self, index: usize) -> f64 {
        match self {
            FrameAxis::Frame => index as f64,
            FrameAxis::Seconds { sample_rate } => index as f64 / sample_rate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameAxis::Frame => "Frame number",
            FrameAxis::Seconds { .. } => "Time [s]",
        }
    }
}

/// Output image geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    /// A 6.4×4.8 inch figure at 100 DPI.
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// A resolved plotting invocation: validated input path + output prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub input: PathBuf,
    pub out_prefix: String,
}

impl Invocation {
    /// Output image path `<prefix><suffix>.png`.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}{suffix}.png", self.out_prefix))
    }
}

/// Everything a plotting pipeline needs besides its input.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub invocation: Invocation,
    pub size: ImageSize,
    pub show: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_suffix_and_extension() {
        let inv = Invocation {
            input: PathBuf::from("fps.csv"),
            out_prefix: "out/fpsGraph".to_string(),
        };
        assert_eq!(inv.output_path(""), PathBuf::from("out/fpsGraph.png"));
        assert_eq!(
            inv.output_path("histAndPDF"),
            PathBuf::from("out/fpsGraphhistAndPDF.png")
        );
    }

    #[test]
    fn seconds_axis_divides_by_sample_rate() {
        let axis = FrameAxis::Seconds { sample_rate: 25.0 };
        assert_eq!(axis.x_value(0), 0.0);
        assert!((axis.x_value(50) - 2.0).abs() < 1e-12);
        assert_eq!(FrameAxis::Frame.x_value(7), 7.0);
    }

    #[test]
    fn histogram_bins_pair_edges_with_densities() {
        let h = Histogram {
            edges: vec![0.0, 1.0, 2.0],
            densities: vec![0.25, 0.75],
        };
        let bins: Vec<_> = h.bins().collect();
        assert_eq!(bins, vec![(0.0, 1.0, 0.25), (1.0, 2.0, 0.75)]);
        assert_eq!(h.bin_count(), 2);
    }
}
