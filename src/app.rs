//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves each command's invocation (argument count, input existence)
//! - runs the matching pipeline
//! - prints the fitted equation / opens the images when asked

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{
    Cli, Command, FrameArgs, GRAPH_PREFIX, MEAN_PREFIX, MeanArgs, PlotArgs, SynthArgs,
    plot_config_from_args,
};
use crate::data::SampleSpec;
use crate::error::AppError;

pub mod pipeline;
pub mod viewer;

/// Entry point for the `fpsplot` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    log::debug!("{cli:?}");

    match cli.command {
        Command::Mean(args) => handle_mean(args),
        Command::MeanTable(args) => handle_mean_table(args),
        Command::Hist(args) => handle_hist(args),
        Command::Frames(args) => handle_frames(args),
        Command::Graph(args) => handle_graph(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_mean(args: MeanArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args.plot, MEAN_PREFIX)?;
    let run = pipeline::run_mean(&config, args.count, args.export_fit.as_deref())?;

    println!("{}", crate::report::format_fit_equation(&run.fit));

    if config.show {
        viewer::show_image(&run.image);
    }
    Ok(())
}

fn handle_mean_table(args: PlotArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args, MEAN_PREFIX)?;
    let run = pipeline::run_mean_table(&config)?;
    show_all(config.show, [run.image]);
    Ok(())
}

fn handle_hist(args: PlotArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args, GRAPH_PREFIX)?;
    let run = pipeline::run_hist(&config)?;
    show_all(config.show, [run.image]);
    Ok(())
}

fn handle_frames(args: FrameArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args.plot, GRAPH_PREFIX)?;
    let axis = pipeline::frame_axis(args.time, args.sample_rate)?;
    let run = pipeline::run_frames(&config, axis)?;
    show_all(config.show, [run.image]);
    Ok(())
}

fn handle_graph(args: FrameArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args.plot, GRAPH_PREFIX)?;
    let axis = pipeline::frame_axis(args.time, args.sample_rate)?;
    let (hist, frames) = pipeline::run_graph(&config, axis)?;
    show_all(config.show, [hist.image, frames.image]);
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        count: args.count,
        mean: args.mean,
        std_dev: args.std_dev,
        seed: args.seed,
        round: args.round,
    };
    pipeline::run_synth(&args.output, &spec)?;
    Ok(())
}

fn show_all<const N: usize>(show: bool, images: [PathBuf; N]) {
    if show {
        for image in &images {
            viewer::show_image(image);
        }
    }
}
