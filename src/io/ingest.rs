//! CSV ingest.
//!
//! Turns the FPS logs written by the capture program (and the aggregated mean
//! tables derived from them) into plain numeric columns.
//!
//! Design goals:
//! - **Strict schema**: a missing column is an error naming the columns found
//! - **Strict rows**: a value that does not parse fails the load with its line number
//! - **Separation of concerns**: no statistics here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::MeanRow;
use crate::error::AppError;

/// Column holding per-frame FPS samples.
pub const FPS_COLUMN: &str = "fps";
/// Columns of a pre-aggregated mean table.
pub const CAM_NUM_COLUMN: &str = "camNum";
pub const FPS_MEAN_COLUMN: &str = "fpsMean";

/// Fail with a not-found error unless `path` is an existing file.
pub fn ensure_input_exists(path: &Path) -> Result<(), AppError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::not_found(format!(
            "Input file '{}' not found. Provide it as an argument!\n\n\
             Example: fpsplot graph fpsFile.csv",
            path.display()
        )))
    }
}

/// Load the `fps` column of a CSV file.
pub fn load_fps_column(path: &Path) -> Result<Vec<f64>, AppError> {
    let mut reader = open_reader(path)?;
    let headers = normalized_headers(&mut reader, path)?;
    let header_map = build_header_map(&headers);
    let col = require_column(&header_map, FPS_COLUMN, path)?;

    let mut values = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!("{}:{line}: CSV parse error: {e}", path.display()))
        })?;
        let raw = record.get(col).unwrap_or("");
        let value = raw.parse::<f64>().map_err(|_| {
            AppError::input(format!(
                "{}:{line}: invalid {FPS_COLUMN} value '{raw}'",
                path.display()
            ))
        })?;
        if !value.is_finite() {
            return Err(AppError::input(format!(
                "{}:{line}: non-finite {FPS_COLUMN} value '{raw}'",
                path.display()
            )));
        }
        values.push(value);
    }

    if values.is_empty() {
        return Err(AppError::input(format!(
            "'{}' has no {FPS_COLUMN} samples.",
            path.display()
        )));
    }

    log::info!("loaded {} samples from {}", values.len(), path.display());
    Ok(values)
}

/// Load a pre-aggregated `camNum,fpsMean` table.
pub fn load_mean_table(path: &Path) -> Result<Vec<MeanRow>, AppError> {
    let mut reader = open_reader(path)?;
    let headers = normalized_headers(&mut reader, path)?;
    let header_map = build_header_map(&headers);
    require_column(&header_map, CAM_NUM_COLUMN, path)?;
    require_column(&header_map, FPS_MEAN_COLUMN, path)?;

    // Deserialize against the cleaned-up header names.
    reader.set_headers(headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<MeanRow>().enumerate() {
        let line = idx + 2;
        let row = result.map_err(|e| AppError::input(format!("{}:{line}: {e}", path.display())))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::input(format!("'{}' has no rows.", path.display())));
    }

    log::info!("loaded {} mean rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Expand a file-name template into the numbered files `1..=count`.
///
/// The first character of the file name is replaced by the configuration
/// number (`1fps.csv` → `1fps.csv`, `2fps.csv`, …); the directory part is kept.
pub fn numbered_paths(template: &Path, count: usize) -> Result<Vec<PathBuf>, AppError> {
    let name = template
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AppError::usage(format!("Invalid file name template '{}'.", template.display()))
        })?;

    let mut chars = name.chars();
    if chars.next().is_none() {
        return Err(AppError::usage("File name template is empty."));
    }
    let rest = chars.as_str();

    Ok((1..=count)
        .map(|i| template.with_file_name(format!("{i}{rest}")))
        .collect())
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Input file '{}' not found.", path.display()))
        } else {
            AppError::input(format!("Failed to open CSV '{}': {e}", path.display()))
        }
    })?;

    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn normalized_headers(
    reader: &mut csv::Reader<File>,
    path: &Path,
) -> Result<StringRecord, AppError> {
    let headers = reader.headers().map_err(|e| {
        AppError::input(format!("Failed to read CSV headers of '{}': {e}", path.display()))
    })?;
    Ok(headers.iter().map(normalize_header_name).collect())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn require_column(
    header_map: &HashMap<String, usize>,
    column: &str,
    path: &Path,
) -> Result<usize, AppError> {
    header_map.get(column).copied().ok_or_else(|| {
        let mut found: Vec<&str> = header_map.keys().map(String::as_str).collect();
        found.sort_unstable();
        AppError::input(format!(
            "'{}' is missing required column '{column}' (found: {}).",
            path.display(),
            found.join(", ")
        ))
    })
}
