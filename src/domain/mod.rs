//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run parameters (`MarginParams`) and the CLI-derived `RunConfig`
//! - classifier output (`EdgeCandidates`)
//! - fit outputs (`CurveModel`, `FitResult`, `CurveFile`, etc.)

pub mod types;

pub use types::*;
