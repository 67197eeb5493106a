//! One pipeline per plotting command.
//!
//! Each function takes a resolved configuration, does the load → compute →
//! render work, and returns what it computed so callers (the CLI, tests) can
//! inspect the results without re-reading the images.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::data::{SampleSpec, generate_fps_samples};
use crate::domain::{FrameAxis, Histogram, ImageSize, InverseFit, MeanRow, NormalFit, PlotConfig};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_inverse_model, fit_normal, pdf_curve};
use crate::io::{
    FitExport, load_fps_column, load_mean_table, numbered_paths, write_fit_json, write_fps_csv,
};
use crate::math::{density_histogram, mean, sturges_bins};
use crate::models::sample_curve;
use crate::plot::{Axes, padded_range, render_histogram, render_line, render_mean_fit};
use crate::report::{format_means_table, format_normal_labels};

/// Suffix of the histogram image.
pub const HIST_SUFFIX: &str = "histAndPDF";

/// Points sampled along fitted curves.
const CURVE_POINTS: usize = 100;

/// Outputs of `fpsplot mean`.
#[derive(Debug, Clone)]
pub struct MeanRun {
    pub configs: Vec<f64>,
    pub means: Vec<f64>,
    pub fit: InverseFit,
    pub image: PathBuf,
}

/// Outputs of `fpsplot hist`.
#[derive(Debug, Clone)]
pub struct HistRun {
    pub samples: usize,
    pub histogram: Histogram,
    pub normal: NormalFit,
    pub image: PathBuf,
}

/// Outputs of `fpsplot frames`.
#[derive(Debug, Clone)]
pub struct FramesRun {
    pub points: Vec<(f64, f64)>,
    pub image: PathBuf,
}

/// Outputs of `fpsplot mean-table`.
#[derive(Debug, Clone)]
pub struct MeanTableRun {
    pub rows: Vec<MeanRow>,
    pub image: PathBuf,
}

/// Mean FPS per numbered configuration file, fitted with `a/x² + b/x`.
pub fn run_mean(
    config: &PlotConfig,
    count: usize,
    export_fit: Option<&Path>,
) -> Result<MeanRun, AppError> {
    if count == 0 {
        return Err(AppError::usage("Configuration count must be > 0."));
    }

    let paths = numbered_paths(&config.invocation.input, count)?;
    let means = config_means(&paths)?;
    let configs: Vec<f64> = (1..=count).map(|i| i as f64).collect();
    log::info!("per-configuration means:\n{}", format_means_table(&configs, &means));

    let fit = fit_inverse_model(&configs, &means, &FitOptions::default())?;
    log::info!(
        "fit converged after {} iterations (sse = {:.6})",
        fit.iterations,
        fit.sse
    );

    let observed: Vec<(f64, f64)> = configs.iter().copied().zip(means.iter().copied()).collect();
    let curve = sample_curve(fit.a, fit.b, 1.0, count as f64, CURVE_POINTS);

    let image = config.invocation.output_path("");
    render_mean_fit(
        &image,
        config.size,
        &observed,
        &curve,
        Axes {
            x_label: "Number of cameras analysed",
            y_label: "Mean FPS",
        },
    )?;
    log::info!("wrote {}", image.display());

    if let Some(path) = export_fit {
        write_fit_json(path, &FitExport::new(fit, &configs, &means))?;
        log::info!("wrote {}", path.display());
    }

    Ok(MeanRun {
        configs,
        means,
        fit,
        image,
    })
}

/// Mean of the `fps` column of every file, in file order.
pub fn config_means(paths: &[PathBuf]) -> Result<Vec<f64>, AppError> {
    paths
        .par_iter()
        .map(|path| {
            let samples = load_fps_column(path)?;
            mean(&samples)
                .ok_or_else(|| AppError::input(format!("'{}' has no samples.", path.display())))
        })
        .collect()
}

/// Line plot of a pre-aggregated mean table.
pub fn run_mean_table(config: &PlotConfig) -> Result<MeanTableRun, AppError> {
    let rows = load_mean_table(&config.invocation.input)?;
    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.cam_num, r.fps_mean)).collect();

    let image = config.invocation.output_path("");
    render_line(
        &image,
        config.size,
        &points,
        Axes {
            x_label: "Number of cameras analysed",
            y_label: "Mean FPS",
        },
    )?;
    log::info!("wrote {}", image.display());

    Ok(MeanTableRun { rows, image })
}

/// Density histogram (Sturges bins) with the fitted normal PDF.
pub fn run_hist(config: &PlotConfig) -> Result<HistRun, AppError> {
    let samples = load_fps_column(&config.invocation.input)?;
    hist_from_samples(&samples, &config.invocation.output_path(HIST_SUFFIX), config.size)
}

fn hist_from_samples(samples: &[f64], image: &Path, size: ImageSize) -> Result<HistRun, AppError> {
    let bins = sturges_bins(samples.len());
    let histogram = density_histogram(samples, bins)
        .ok_or_else(|| AppError::input("FPS samples must be finite to build a histogram."))?;
    let normal = fit_normal(samples)?;
    log::info!(
        "{} samples, {bins} bins, mu = {:.4}, sigma = {:.4}",
        samples.len(),
        normal.mu,
        normal.sigma
    );

    let lo = histogram.edges.first().copied().unwrap_or(normal.mu);
    let hi = histogram.edges.last().copied().unwrap_or(normal.mu);
    let x_bounds = padded_range(lo, hi, 0.05);

    let pdf = pdf_curve(&normal, x_bounds[0], x_bounds[1], CURVE_POINTS);
    if pdf.is_none() {
        log::warn!("all samples equal {:.4}; skipping the normal PDF overlay", normal.mu);
    }
    let labels = format_normal_labels(&normal);

    render_histogram(
        image,
        size,
        &histogram,
        pdf.as_deref().map(|curve| (curve, &labels[..])),
        x_bounds,
        Axes {
            x_label: "FPS",
            y_label: "Frequency density",
        },
    )?;
    log::info!("wrote {}", image.display());

    Ok(HistRun {
        samples: samples.len(),
        histogram,
        normal,
        image: image.to_path_buf(),
    })
}

/// FPS value per frame (or per elapsed second).
pub fn run_frames(config: &PlotConfig, axis: FrameAxis) -> Result<FramesRun, AppError> {
    let samples = load_fps_column(&config.invocation.input)?;
    frames_from_samples(&samples, &config.invocation.output_path(""), config.size, axis)
}

fn frames_from_samples(
    samples: &[f64],
    image: &Path,
    size: ImageSize,
    axis: FrameAxis,
) -> Result<FramesRun, AppError> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &fps)| (axis.x_value(i), fps))
        .collect();

    render_line(
        image,
        size,
        &points,
        Axes {
            x_label: axis.label(),
            y_label: "FPS",
        },
    )?;
    log::info!("wrote {}", image.display());

    Ok(FramesRun {
        points,
        image: image.to_path_buf(),
    })
}

/// Histogram then frame plot from a single load of the input.
pub fn run_graph(config: &PlotConfig, axis: FrameAxis) -> Result<(HistRun, FramesRun), AppError> {
    let samples = load_fps_column(&config.invocation.input)?;
    let hist_image = config.invocation.output_path(HIST_SUFFIX);
    let hist = hist_from_samples(&samples, &hist_image, config.size)?;
    let frames_image = config.invocation.output_path("");
    let frames = frames_from_samples(&samples, &frames_image, config.size, axis)?;
    Ok((hist, frames))
}

/// Write a synthetic FPS log; returns the number of rows written.
pub fn run_synth(output: &Path, spec: &SampleSpec) -> Result<usize, AppError> {
    let samples = generate_fps_samples(spec)?;
    write_fps_csv(output, &samples)?;
    log::info!("wrote {} samples to {}", samples.len(), output.display());
    Ok(samples.len())
}

/// Build the frame axis from the `--time` / `--sample-rate` options.
pub fn frame_axis(time: bool, sample_rate: f64) -> Result<FrameAxis, AppError> {
    if !time {
        return Ok(FrameAxis::Frame);
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(AppError::usage("Sample rate must be a positive number."));
    }
    Ok(FrameAxis::Seconds { sample_rate })
}
