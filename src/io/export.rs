//! Output writers: fitted-model JSON and FPS sample CSVs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::InverseFit;
use crate::error::AppError;
use crate::io::ingest::FPS_COLUMN;

/// Portable record of a `fpsplot mean` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitExport {
    pub tool: String,
    pub model: String,
    pub fit: InverseFit,
    /// Camera counts `1..=N`.
    pub configs: Vec<f64>,
    /// Observed mean FPS per configuration.
    pub means: Vec<f64>,
}

impl FitExport {
    pub fn new(fit: InverseFit, configs: &[f64], means: &[f64]) -> Self {
        Self {
            tool: "fpsplot".to_string(),
            model: "a/x^2 + b/x".to_string(),
            fit,
            configs: configs.to_vec(),
            means: means.to_vec(),
        }
    }
}

/// Write the fit record as pretty-printed JSON.
pub fn write_fit_json(path: &Path, export: &FitExport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::output(format!("Failed to create fit JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, export)
        .map_err(|e| AppError::output(format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit record written by [`write_fit_json`].
pub fn read_fit_json(path: &Path) -> Result<FitExport, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open fit JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid fit JSON: {e}")))
}

/// Write an `fps` CSV, one sample per row.
pub fn write_fps_csv(path: &Path, values: &[f64]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer
        .write_record([FPS_COLUMN])
        .map_err(|e| AppError::output(format!("Failed to write CSV header: {e}")))?;
    for v in values {
        writer
            .write_record([v.to_string()])
            .map_err(|e| AppError::output(format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush CSV '{}': {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::load_fps_column;

    #[test]
    fn fit_json_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        let fit = InverseFit { a: -21.5, b: 81.25, sse: 0.75, iterations: 4 };
        let export = FitExport::new(fit, &[1.0, 2.0], &[60.0, 35.0]);

        write_fit_json(&path, &export).unwrap();
        assert_eq!(read_fit_json(&path).unwrap(), export);
    }

    #[test]
    fn fit_json_keeps_full_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.json");
        let fit = InverseFit {
            a: -154.36594667276796,
            b: 142.86783377661627,
            sse: 1937.0694435376095,
            iterations: 3,
        };
        let export = FitExport::new(fit, &[1.0, 2.0, 3.0], &[0.1, 1.0 / 3.0, 24.000000000000004]);

        write_fit_json(&path, &export).unwrap();
        let reloaded = read_fit_json(&path).unwrap();
        assert_eq!(reloaded.fit.b.to_bits(), fit.b.to_bits());
        assert_eq!(reloaded, export);
    }

    #[test]
    fn fps_csv_is_readable_by_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fps.csv");
        write_fps_csv(&path, &[29.5, 31.0, 30.25]).unwrap();
        assert_eq!(load_fps_column(&path).unwrap(), vec![29.5, 31.0, 30.25]);
    }
}
