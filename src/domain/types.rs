//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during classification and fitting
//! - exported to JSON/CSV
//! - reloaded later for evaluation

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{MarginError, MarginResult};
use crate::models::predict;

/// Tuning parameters of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginParams {
    /// Neighbourhood size, including the query point itself.
    pub k: usize,
    /// A point is an edge candidate when its smallest local eigenvalue is strictly
    /// below this value (squared length units).
    pub threshold: f64,
    /// Degree of the fitted margin polynomial.
    pub degree: usize,
}

impl Default for MarginParams {
    fn default() -> Self {
        Self {
            k: 10,
            threshold: 0.01,
            degree: 5,
        }
    }
}

impl MarginParams {
    /// Reject parameter values outside their domain.
    ///
    /// Point-count requirements are checked later, against the actual data.
    pub fn validate(&self) -> MarginResult<()> {
        if self.k == 0 {
            return Err(MarginError::invalid("k must be at least 1"));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(MarginError::invalid(format!(
                "threshold must be a positive finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Points flagged by the classifier, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeCandidates {
    /// Positions of the candidates in the classified point set.
    pub indices: Vec<usize>,
    pub points: Vec<Point3<f64>>,
}

impl EdgeCandidates {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A fitted polynomial `y = f(x)`.
///
/// Coefficients are stored highest order first, so `[1.0, 0.0, 0.0]` is `x²`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveModel {
    pub degree: usize,
    pub coefficients: Vec<f64>,
}

impl CurveModel {
    /// Evaluate the curve at `x`. Outside the fitted x-range this is plain
    /// extrapolation.
    pub fn evaluate(&self, x: f64) -> f64 {
        predict(&self.coefficients, x)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Sample the curve on `n` evenly spaced x-values over `[x_min, x_max]`.
    pub fn sample_grid(&self, x_min: f64, x_max: f64, n: usize) -> CurveGrid {
        let x = crate::math::linspace(x_min, x_max, n);
        let y = self.evaluate_many(&x);
        CurveGrid { x, y }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Fit output: model plus diagnostics and the observed x-range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: CurveModel,
    pub quality: FitQuality,
    pub x_min: f64,
    pub x_max: f64,
}

/// Summary stats about an input cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudStats {
    pub n_points: usize,
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl CloudStats {
    /// Axis-aligned bounds of `points`; `None` when empty.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some(Self {
            n_points: points.len(),
            min,
            max,
        })
    }
}

/// A full `margin detect` configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub params: MarginParams,
    /// Number of x-samples written to the curve grid.
    pub grid_points: usize,
    pub export_edges: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub params: MarginParams,
    pub n_points: usize,
    pub n_edges: usize,
    pub fit: FitResult,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
