//! PNG chart rendering with Plotters.
//!
//! Every chart follows the same shape:
//! - the data (series, bounds, labels) is computed by the caller
//! - `render_*` opens a bitmap backend on the output path, draws, and presents
//!
//! Drawing errors are collected as `Box<dyn Error>` inside the `draw_*`
//! helpers and turned into a single `AppError` at the public boundary.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::{Histogram, ImageSize};
use crate::error::AppError;

type DrawResult = Result<(), Box<dyn Error>>;

const BAR_FILL: RGBColor = RGBColor(173, 216, 230); // light blue
const BAR_EDGE: RGBColor = RGBColor(128, 128, 128); // grey
const MARKER: RGBColor = RGBColor(0, 255, 255); // cyan
const FONT: &str = "sans-serif";

/// Axis descriptions shared by all charts.
#[derive(Debug, Clone, Copy)]
pub struct Axes<'a> {
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Observed per-configuration means + fitted curve.
pub fn render_mean_fit(
    path: &Path,
    size: ImageSize,
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    axes: Axes<'_>,
) -> Result<(), AppError> {
    prepare_output(path)?;
    draw_mean_fit(path, size, observed, curve, axes).map_err(|e| render_error(path, e))
}

/// Plain line plot of `(x, y)` points (mean table, FPS over frames).
pub fn render_line(
    path: &Path,
    size: ImageSize,
    points: &[(f64, f64)],
    axes: Axes<'_>,
) -> Result<(), AppError> {
    prepare_output(path)?;
    draw_line(path, size, points, axes).map_err(|e| render_error(path, e))
}

/// Density histogram with an optional PDF overlay and its legend lines.
///
/// The first legend line is attached to the PDF curve; the rest are listed
/// beneath it without a marker.
pub fn render_histogram(
    path: &Path,
    size: ImageSize,
    hist: &Histogram,
    pdf: Option<(&[(f64, f64)], &[String])>,
    x_bounds: [f64; 2],
    axes: Axes<'_>,
) -> Result<(), AppError> {
    prepare_output(path)?;
    draw_histogram(path, size, hist, pdf, x_bounds, axes).map_err(|e| render_error(path, e))
}

/// Expand `[lo, hi]` by `frac` of its span on each side.
///
/// A zero-width (or inverted) range is widened to `[lo - 0.5, lo + 0.5]`.
pub fn padded_range(lo: f64, hi: f64, frac: f64) -> [f64; 2] {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
        let c = if lo.is_finite() { lo } else { 0.0 };
        return [c - 0.5, c + 0.5];
    }
    let pad = (hi - lo) * frac;
    [lo - pad, hi + pad]
}

/// Min/max over the y values of a series.
pub fn y_extent(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    x_or_y_extent(points.iter().map(|p| p.1))
}

/// Min/max over the x values of a series.
pub fn x_extent(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    x_or_y_extent(points.iter().map(|p| p.0))
}

fn x_or_y_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn prepare_output(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::output(format!(
                "Failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

fn render_error(path: &Path, err: Box<dyn Error>) -> AppError {
    AppError::render(format!("Failed to render '{}': {err}", path.display()))
}

fn draw_mean_fit(
    path: &Path,
    size: ImageSize,
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    axes: Axes<'_>,
) -> DrawResult {
    let (x_lo, x_hi) = x_extent(observed).ok_or("no observed means to plot")?;
    let (obs_lo, obs_hi) = y_extent(observed).ok_or("no observed means to plot")?;
    let (fit_lo, fit_hi) = y_extent(curve).unwrap_or((obs_lo, obs_hi));
    let [x0, x1] = padded_range(x_lo, x_hi, 0.05);
    let [y0, y1] = padded_range(obs_lo.min(fit_lo), obs_hi.max(fit_hi), 0.05);

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // One tick per configuration.
    let ticks = (x_hi - x_lo).round().max(1.0) as usize + 1;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ticks)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .x_desc(axes.x_label)
        .y_desc(axes.y_label)
        .label_style((FONT, 14))
        .draw()?;

    chart
        .draw_series(DashedLineSeries::new(
            curve.iter().copied(),
            8,
            5,
            RED.stroke_width(2),
        ))?
        .label("Curve fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .draw_series(
            observed
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, MARKER.filled())),
        )?
        .label("Observed")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, MARKER.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_line(path: &Path, size: ImageSize, points: &[(f64, f64)], axes: Axes<'_>) -> DrawResult {
    let (x_lo, x_hi) = x_extent(points).ok_or("no points to plot")?;
    let (y_lo, y_hi) = y_extent(points).ok_or("no points to plot")?;
    let [x0, x1] = padded_range(x_lo, x_hi, 0.05);
    let [y0, y1] = padded_range(y_lo, y_hi, 0.05);

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_label)
        .y_desc(axes.y_label)
        .label_style((FONT, 14))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(1)))?;

    root.present()?;
    Ok(())
}

fn draw_histogram(
    path: &Path,
    size: ImageSize,
    hist: &Histogram,
    pdf: Option<(&[(f64, f64)], &[String])>,
    x_bounds: [f64; 2],
    axes: Axes<'_>,
) -> DrawResult {
    let [x0, x1] = x_bounds;
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        return Err("invalid histogram x bounds".into());
    }

    let bar_max = hist.densities.iter().copied().fold(0.0, f64::max);
    let pdf_max = pdf
        .and_then(|(curve, _)| y_extent(curve))
        .map(|(_, hi)| hi)
        .unwrap_or(0.0);
    let y_top = bar_max.max(pdf_max);
    let y1 = if y_top > 0.0 { y_top * 1.05 } else { 1.0 };

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0.0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(axes.x_label)
        .y_desc(axes.y_label)
        .y_label_formatter(&|v| format!("{v:.3}"))
        .label_style((FONT, 14))
        .draw()?;

    chart.draw_series(
        hist.bins()
            .map(|(l, r, d)| Rectangle::new([(l, 0.0), (r, d)], BAR_FILL.filled())),
    )?;
    chart.draw_series(
        hist.bins()
            .map(|(l, r, d)| Rectangle::new([(l, 0.0), (r, d)], BAR_EDGE.stroke_width(1))),
    )?;

    if let Some((curve, labels)) = pdf {
        let mut labels = labels.iter();
        let first = labels.next().map(String::as_str).unwrap_or_default();
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), BLACK.stroke_width(2)))?
            .label(first)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

        for label in labels {
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
                .label(label.as_str())
                .legend(|(x, y)| EmptyElement::at((x, y)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_expands_both_sides() {
        let [lo, hi] = padded_range(10.0, 20.0, 0.05);
        assert!((lo - 9.5).abs() < 1e-12);
        assert!((hi - 20.5).abs() < 1e-12);
    }

    #[test]
    fn padded_range_widens_degenerate_span() {
        assert_eq!(padded_range(3.0, 3.0, 0.05), [2.5, 3.5]);
        assert_eq!(padded_range(f64::NAN, 1.0, 0.05), [-0.5, 0.5]);
    }

    #[test]
    fn extents_skip_non_finite_values() {
        let pts = [(1.0, 5.0), (f64::NAN, 2.0), (3.0, f64::INFINITY)];
        assert_eq!(x_extent(&pts), Some((1.0, 3.0)));
        assert_eq!(y_extent(&pts), Some((2.0, 5.0)));
        assert_eq!(y_extent(&[]), None);
    }
}
