//! The detection pipeline shared by every front-end.
//!
//! point set -> classify -> (fail if empty) -> fit
//!
//! `run_pipeline` is the pure core over in-memory points; `run_detect` adds CSV
//! loading for the `margin detect` command.

use log::info;
use nalgebra::Point3;

use crate::classify::classify;
use crate::domain::{CloudStats, EdgeCandidates, FitResult, MarginParams, RunConfig};
use crate::error::{AppError, InputKind, MarginError, MarginResult};
use crate::fit::fit_with_quality;
use crate::io::ingest::{IngestedCloud, load_point_cloud};

/// All computed outputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub edges: EdgeCandidates,
    pub fit: FitResult,
    pub stats: CloudStats,
}

/// Outputs of a `margin detect` run, including ingest bookkeeping.
#[derive(Debug, Clone)]
pub struct DetectRun {
    pub cloud: IngestedCloud,
    pub output: PipelineOutput,
}

/// Classify `points` and fit the margin curve through the candidates.
pub fn run_pipeline(points: &[Point3<f64>], params: &MarginParams) -> MarginResult<PipelineOutput> {
    params.validate()?;

    // Bounds need at least one point; an empty set is short of any k.
    let stats = CloudStats::from_points(points).ok_or(MarginError::InsufficientInput {
        kind: InputKind::PointSet,
        required: params.k,
        actual: 0,
    })?;

    let edges = classify(points, params.k, params.threshold)?;
    if edges.is_empty() {
        return Err(MarginError::EmptyResult {
            k: params.k,
            threshold: params.threshold,
        });
    }

    let fit = fit_with_quality(&edges.points, params.degree)?;
    info!(
        "fitted degree {} margin curve through {} edge candidates (rmse {:.6})",
        params.degree,
        edges.len(),
        fit.quality.rmse
    );

    Ok(PipelineOutput { edges, fit, stats })
}

/// Load the configured CSV and run the pipeline over it.
pub fn run_detect(config: &RunConfig) -> Result<DetectRun, AppError> {
    let cloud = load_point_cloud(&config.input)?;
    let output = run_pipeline(&cloud.points, &config.params)?;
    Ok(DetectRun { cloud, output })
}
