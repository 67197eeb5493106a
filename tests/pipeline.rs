//! End-to-end runs of the plotting pipelines against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use fps_graphs::app::pipeline::{self, HIST_SUFFIX};
use fps_graphs::cli::{Cli, Command, GRAPH_PREFIX, plot_config_from_args};
use fps_graphs::data::SampleSpec;
use fps_graphs::domain::{FrameAxis, ImageSize, Invocation, PlotConfig};
use fps_graphs::error::ErrorKind;
use fps_graphs::io::read_fit_json;

fn config(input: &Path, out_prefix: &Path) -> PlotConfig {
    PlotConfig {
        invocation: Invocation {
            input: input.to_path_buf(),
            out_prefix: out_prefix.to_str().unwrap().to_string(),
        },
        size: ImageSize::default(),
        show: false,
    }
}

fn assert_non_empty_file(path: &Path) {
    let meta = fs::metadata(path).unwrap_or_else(|e| panic!("{} missing: {e}", path.display()));
    assert!(meta.len() > 0, "{} is empty", path.display());
}

fn write_samples(path: &Path, values: &[f64]) {
    let mut body = String::from("fps\n");
    for v in values {
        body.push_str(&format!("{v}\n"));
    }
    fs::write(path, body).unwrap();
}

#[test]
fn mean_of_constant_files_and_fit() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=13 {
        write_samples(&dir.path().join(format!("{i}fps.csv")), &[24.0, 24.0, 24.0]);
    }
    let out = dir.path().join("fpsMeanGraph");
    let export = dir.path().join("fit.json");

    let cfg = config(&dir.path().join("1fps.csv"), &out);
    let run = pipeline::run_mean(&cfg, 13, Some(&export)).unwrap();

    assert_eq!(run.means, vec![24.0; 13]);
    assert_eq!(run.configs.first().copied(), Some(1.0));
    assert_eq!(run.configs.last().copied(), Some(13.0));
    assert!(run.fit.a.is_finite() && run.fit.b.is_finite());
    assert_eq!(run.image, PathBuf::from(format!("{}.png", out.display())));
    assert_non_empty_file(&run.image);

    let saved = read_fit_json(&export).unwrap();
    assert_eq!(saved.fit, run.fit);
    assert_eq!(saved.means, run.means);
}

#[test]
fn mean_with_missing_numbered_file_fails_without_image() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=12 {
        write_samples(&dir.path().join(format!("{i}fps.csv")), &[30.0]);
    }
    let out = dir.path().join("fpsMeanGraph");

    let cfg = config(&dir.path().join("1fps.csv"), &out);
    let err = pipeline::run_mean(&cfg, 13, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains("13fps.csv"), "{}", err.message());
    assert!(!dir.path().join("fpsMeanGraph.png").exists());
}

#[test]
fn histogram_of_synthetic_normal_sample() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fps.csv");
    let written = pipeline::run_synth(&input, &SampleSpec::default()).unwrap();
    assert_eq!(written, 10_000);

    let out = dir.path().join("fpsGraph");
    let run = pipeline::run_hist(&config(&input, &out)).unwrap();

    assert_eq!(run.samples, 10_000);
    // floor(1 + 3.322 * ln(10000))
    assert_eq!(run.histogram.bin_count(), 31);
    assert!((run.normal.mu - 30.0).abs() < 0.1, "mu = {}", run.normal.mu);
    assert!((run.normal.sigma - 2.0).abs() < 0.1, "sigma = {}", run.normal.sigma);
    assert_eq!(run.image, dir.path().join(format!("fpsGraph{HIST_SUFFIX}.png")));
    assert_non_empty_file(&run.image);
}

#[test]
fn graph_writes_histogram_and_frame_plots() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fps.csv");
    write_samples(&input, &[30.0, 28.0, 31.0, 29.0, 30.0, 32.0, 27.0, 30.0, 31.0, 29.0]);
    let out = dir.path().join("fpsGraph");

    let axis = pipeline::frame_axis(true, 25.0).unwrap();
    let (hist, frames) = pipeline::run_graph(&config(&input, &out), axis).unwrap();

    assert_eq!(hist.histogram.bin_count(), 8);
    assert_non_empty_file(&dir.path().join("fpsGraphhistAndPDF.png"));
    assert_non_empty_file(&dir.path().join("fpsGraph.png"));

    assert_eq!(frames.points.len(), 10);
    let (last_t, last_fps) = frames.points[9];
    assert!((last_t - 9.0 / 25.0).abs() < 1e-12);
    assert_eq!(last_fps, 29.0);
}

#[test]
fn frames_default_to_frame_index() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fps.csv");
    write_samples(&input, &[60.0, 58.0, 61.0]);
    let out = dir.path().join("nested/out/run");

    let run = pipeline::run_frames(&config(&input, &out), FrameAxis::Frame).unwrap();
    assert_eq!(run.points, vec![(0.0, 60.0), (1.0, 58.0), (2.0, 61.0)]);
    assert_non_empty_file(&run.image);
}

#[test]
fn constant_sample_histogram_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fps.csv");
    write_samples(&input, &[25.0; 20]);
    let out = dir.path().join("flat");

    let run = pipeline::run_hist(&config(&input, &out)).unwrap();
    assert_eq!(run.normal.sigma, 0.0);
    assert_non_empty_file(&run.image);
}

#[test]
fn mean_table_plot() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("means.csv");
    fs::write(&input, "camNum,fpsMean\n1,60\n2,34.5\n3,24\n4,19.25\n").unwrap();
    let out = dir.path().join("fpsMeanGraph");

    let run = pipeline::run_mean_table(&config(&input, &out)).unwrap();
    assert_eq!(run.rows.len(), 4);
    assert_eq!(run.rows[3].fps_mean, 19.25);
    assert_non_empty_file(&run.image);
}

#[test]
fn missing_input_produces_no_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.csv");
    let out = dir.path().join("fpsGraph");

    let argv = ["fpsplot", "hist", input.to_str().unwrap(), out.to_str().unwrap()];
    let cli = Cli::try_parse_from(argv).unwrap();
    let Command::Hist(args) = cli.command else {
        panic!("expected hist command");
    };

    let err = plot_config_from_args(&args, GRAPH_PREFIX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn synth_round_matches_capture_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.csv");
    let spec = SampleSpec {
        count: 500,
        round: true,
        ..SampleSpec::default()
    };

    let written = pipeline::run_synth(&path, &spec).unwrap();
    let body = fs::read_to_string(&path).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("fps"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), written);
    assert!(rows.iter().all(|r| r.parse::<u32>().is_ok()), "non-integer row");
}
