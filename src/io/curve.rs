//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted margin curve:
//! - polynomial degree + coefficients (highest order first)
//! - run parameters (k, threshold, degree) and point counts
//! - a precomputed grid over the fitted x-range for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::app::pipeline::PipelineOutput;
use crate::domain::{CurveFile, CurveGrid, FitResult, MarginParams};
use crate::error::AppError;

/// Build the curve file for a finished run.
pub fn curve_file(output: &PipelineOutput, params: &MarginParams, grid_points: usize) -> CurveFile {
    CurveFile {
        tool: "margin".to_string(),
        generated_at: Utc::now(),
        params: *params,
        n_points: output.stats.n_points,
        n_edges: output.edges.len(),
        fit: output.fit.clone(),
        grid: build_grid(&output.fit, grid_points),
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    if curve.fit.model.coefficients.len() != curve.fit.model.degree + 1 {
        return Err(AppError::new(
            2,
            format!(
                "Invalid curve JSON: degree {} needs {} coefficients, found {}",
                curve.fit.model.degree,
                curve.fit.model.degree + 1,
                curve.fit.model.coefficients.len()
            ),
        ));
    }
    Ok(curve)
}

/// Sample the fitted curve over its observed x-range.
///
/// A zero-width range is widened so the grid still shows a line.
fn build_grid(fit: &FitResult, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut x0 = fit.x_min;
    let mut x1 = fit.x_max;
    if (x1 - x0).abs() < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }
    fit.model.sample_grid(x0, x1, n)
}
