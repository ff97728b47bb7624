//! Point-cloud CSV ingest.
//!
//! The sampler hands us a CSV with one point per row. Only the `x`, `y`, `z`
//! columns are read (header names are matched case-insensitively); anything else,
//! such as normals, is ignored.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no classification logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, warn};
use nalgebra::Point3;

use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: points in file order + row errors.
#[derive(Debug, Clone)]
pub struct IngestedCloud {
    pub points: Vec<Point3<f64>>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a point cloud from a CSV file.
pub fn load_point_cloud(path: &Path) -> Result<IngestedCloud, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open point cloud CSV '{}': {e}", path.display()),
        )
    })?;
    let cloud = read_point_cloud(file)?;
    debug!(
        "loaded {} points from '{}' ({} rows skipped)",
        cloud.points.len(),
        path.display(),
        cloud.row_errors.len()
    );
    Ok(cloud)
}

/// Read a point cloud from any CSV source.
pub fn read_point_cloud<R: Read>(source: R) -> Result<IngestedCloud, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut columns = [0usize; 3];
    for (slot, name) in columns.iter_mut().zip(["x", "y", "z"]) {
        *slot = *header_map
            .get(name)
            .ok_or_else(|| AppError::new(2, format!("Missing required column '{name}'.")))?;
    }

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_point(&record, &columns) {
            Ok(p) => points.push(p),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!("skipped {} of {rows_read} rows with invalid coordinates", row_errors.len());
    }

    if points.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid points in CSV ({rows_read} rows read)."),
        ));
    }

    Ok(IngestedCloud {
        points,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn parse_point(record: &StringRecord, columns: &[usize; 3]) -> Result<Point3<f64>, String> {
    let mut coords = [0.0; 3];
    for (axis, (&col, value)) in columns.iter().zip(coords.iter_mut()).enumerate() {
        let name = ["x", "y", "z"][axis];
        let raw = record
            .get(col)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing '{name}'"))?;
        let parsed: f64 = raw
            .parse()
            .map_err(|_| format!("'{name}' is not a number: '{raw}'"))?;
        if !parsed.is_finite() {
            return Err(format!("'{name}' is not finite: '{raw}'"));
        }
        *value = parsed;
    }
    Ok(Point3::new(coords[0], coords[1], coords[2]))
}
