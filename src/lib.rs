//! `margin-curve` library crate.
//!
//! Locates the margin line of a scanned dental preparation: points of a sampled
//! cloud are classified as edge candidates from the spectrum of their local
//! covariance, and a polynomial curve is fitted through the candidates.
//!
//! The binary (`margin`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the classifier and fitter can be driven by other front-ends

pub mod app;
pub mod classify;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod spatial;

pub use app::pipeline::{PipelineOutput, run_pipeline};
pub use classify::classify;
pub use domain::{CurveModel, EdgeCandidates, MarginParams};
pub use error::{MarginError, MarginResult};
pub use fit::fit;
