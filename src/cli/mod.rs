//! Command-line parsing for the FPS plotting tool.
//!
//! The goal of this module is to keep **argument parsing** and **invocation
//! resolution** separate from loading, statistics and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_CONFIG_COUNT, DEFAULT_INPUT, DEFAULT_SAMPLE_RATE, ImageSize, Invocation, PlotConfig,
};
use crate::error::AppError;
use crate::io::ensure_input_exists;

/// Default output prefix of the mean commands.
pub const MEAN_PREFIX: &str = "fpsMeanGraph";
/// Default output prefix of the histogram / frame commands.
pub const GRAPH_PREFIX: &str = "fpsGraph";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fpsplot", version, about = "FPS statistics and plots from CSV logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mean FPS of numbered per-configuration CSVs, fitted with y = a/x^2 + b/x.
    Mean(MeanArgs),
    /// Line plot of a pre-aggregated camNum,fpsMean table.
    MeanTable(PlotArgs),
    /// Density histogram of FPS samples with a fitted normal PDF.
    Hist(PlotArgs),
    /// FPS per frame (or per second with --time).
    Frames(FrameArgs),
    /// Histogram + frame plot in one run.
    Graph(FrameArgs),
    /// Write a synthetic FPS log.
    Synth(SynthArgs),
}

/// Positional arguments and image options shared by every plotting command.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file prefix (".png" and a per-chart suffix are appended).
    #[arg(value_name = "OUTPUT_PREFIX")]
    pub out_prefix: Option<String>,

    /// Anything past the two positionals; rejected during resolution.
    #[arg(hide = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// Image width in pixels.
    #[arg(long, env = "FPSPLOT_WIDTH", default_value_t = ImageSize::default().width)]
    pub width: u32,

    /// Image height in pixels.
    #[arg(long, env = "FPSPLOT_HEIGHT", default_value_t = ImageSize::default().height)]
    pub height: u32,

    /// Open the written image(s) in the system viewer.
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Args, Clone)]
pub struct MeanArgs {
    #[command(flatten)]
    pub plot: PlotArgs,

    /// Number of numbered configuration files (1..=N).
    #[arg(long, default_value_t = DEFAULT_CONFIG_COUNT)]
    pub count: usize,

    /// Also write the fitted parameters and means as JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FrameArgs {
    #[command(flatten)]
    pub plot: PlotArgs,

    /// Plot elapsed seconds instead of frame numbers.
    #[arg(long)]
    pub time: bool,

    /// Sampling rate (frames per second) used by --time.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: f64,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output CSV file.
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_INPUT)]
    pub output: PathBuf,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    /// Mean FPS.
    #[arg(long, default_value_t = 30.0)]
    pub mean: f64,

    /// FPS standard deviation.
    #[arg(long, default_value_t = 2.0)]
    pub std_dev: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Truncate to whole FPS values like the capture program does.
    #[arg(long)]
    pub round: bool,
}

/// Resolve positionals to an [`Invocation`].
///
/// Fails with "Too many arguments" before touching the filesystem, then with a
/// not-found error if the input file is missing.
pub fn resolve_invocation(args: &PlotArgs, default_prefix: &str) -> Result<Invocation, AppError> {
    if !args.extra.is_empty() {
        return Err(AppError::usage("Too many arguments"));
    }

    let input = args.input.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let out_prefix = args.out_prefix.clone().unwrap_or_else(|| default_prefix.to_string());

    ensure_input_exists(&input)?;

    Ok(Invocation { input, out_prefix })
}

/// Build the full plotting configuration from parsed arguments.
pub fn plot_config_from_args(
    args: &PlotArgs,
    default_prefix: &str,
) -> Result<PlotConfig, AppError> {
    if args.width == 0 || args.height == 0 {
        return Err(AppError::usage("Image width and height must be > 0."));
    }
    let invocation = resolve_invocation(args, default_prefix)?;
    Ok(PlotConfig {
        invocation,
        size: ImageSize {
            width: args.width,
            height: args.height,
        },
        show: args.show,
    })
}
