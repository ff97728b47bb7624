//! Polynomial fit of the margin curve through edge candidates.
//!
//! Given edge points, we:
//! - project them onto the x/y plane
//! - order them by ascending x (ties keep their input order)
//! - solve the least-squares problem `y ≈ Σ c_j x^(d-j)` for `d + 1` coefficients
//!
//! and return the coefficients highest order first.
//!
//! Fewer than `d + 1` points is an input problem; a rank-deficient design matrix
//! (every point sharing one x, or powers of x that overflow) is a numerical one.
//! The two are reported as different errors and the degree is never lowered to
//! make a fit succeed.

use log::debug;
use nalgebra::{DMatrix, DVector, Point3};

use crate::domain::{CurveModel, FitQuality, FitResult};
use crate::error::{InputKind, MarginError, MarginResult};
use crate::math::solve_least_squares;
use crate::models::{fill_design_row, predict};

/// Fit a polynomial of `degree` mapping x to y.
pub fn fit(edge_points: &[Point3<f64>], degree: usize) -> MarginResult<CurveModel> {
    fit_with_quality(edge_points, degree).map(|fit| fit.model)
}

/// Fit a polynomial of `degree` and report residual diagnostics.
pub fn fit_with_quality(edge_points: &[Point3<f64>], degree: usize) -> MarginResult<FitResult> {
    let required = degree.saturating_add(1);
    if edge_points.len() < required {
        return Err(MarginError::InsufficientInput {
            kind: InputKind::EdgeCandidates,
            required,
            actual: edge_points.len(),
        });
    }
    if let Some(i) = edge_points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(MarginError::invalid(format!(
            "edge point {i} has a non-finite x or y coordinate"
        )));
    }

    // Work on a projected copy; the caller's slice is left as it was.
    let mut xy: Vec<(f64, f64)> = edge_points.iter().map(|p| (p.x, p.y)).collect();
    xy.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = xy.len();
    let mut design = DMatrix::<f64>::zeros(n, required);
    let mut rhs = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; required];

    for (i, &(x, y)) in xy.iter().enumerate() {
        fill_design_row(x, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
        rhs[i] = y;
    }

    let beta = solve_least_squares(&design, &rhs).map_err(|deficiency| {
        MarginError::DegenerateFit {
            degree,
            rank: deficiency.rank,
            required,
        }
    })?;

    let coefficients: Vec<f64> = beta.iter().copied().collect();

    let sse: f64 = xy
        .iter()
        .map(|&(x, y)| {
            let r = y - predict(&coefficients, x);
            r * r
        })
        .sum();
    let rmse = (sse / n as f64).sqrt();

    let x_min = xy[0].0;
    let x_max = xy[n - 1].0;

    debug!("fitted degree {degree} over {n} points, x=[{x_min:.4}, {x_max:.4}], rmse={rmse:.6}");

    Ok(FitResult {
        model: CurveModel {
            degree,
            coefficients,
        },
        quality: FitQuality { sse, rmse, n },
        x_min,
        x_max,
    })
}
