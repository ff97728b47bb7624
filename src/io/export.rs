//! CSV exports: detected edge candidates and raw point clouds.
//!
//! The exports are meant to be easy to consume in spreadsheets, plotting scripts,
//! or as input to another `margin detect` run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::domain::EdgeCandidates;
use crate::error::AppError;

/// Write edge candidates with their index in the classified point set.
pub fn write_edges_csv(path: &Path, edges: &EdgeCandidates) -> Result<(), AppError> {
    let mut out = create(path)?;

    writeln!(out, "index,x,y,z").map_err(write_err)?;
    for (&i, p) in edges.indices.iter().zip(edges.points.iter()) {
        writeln!(out, "{},{:.10},{:.10},{:.10}", i, p.x, p.y, p.z).map_err(write_err)?;
    }
    out.flush().map_err(write_err)
}

/// Write a point cloud in the format `load_point_cloud` reads.
pub fn write_points_csv(path: &Path, points: &[Point3<f64>]) -> Result<(), AppError> {
    let mut out = create(path)?;

    writeln!(out, "x,y,z").map_err(write_err)?;
    for p in points {
        writeln!(out, "{:.10},{:.10},{:.10}", p.x, p.y, p.z).map_err(write_err)?;
    }
    out.flush().map_err(write_err)
}

fn create(path: &Path) -> Result<BufWriter<File>, AppError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write CSV: {e}"))
}
