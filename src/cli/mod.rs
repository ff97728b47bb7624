//! Command-line parsing for the margin detector.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the geometry/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "margin", version, about = "Preparation margin-line detector for sampled dental scans")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect edge candidates in a point-cloud CSV and fit the margin curve.
    Detect(DetectArgs),
    /// Write a synthetic preparation point cloud (for demos and testing).
    Synth(SynthArgs),
    /// Evaluate a previously exported curve JSON over an x-range.
    Eval(EvalArgs),
}

/// Options for a detection run.
#[derive(Debug, Parser, Clone)]
pub struct DetectArgs {
    /// Point-cloud CSV with `x`, `y`, `z` columns.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Neighbourhood size (including the point itself).
    #[arg(short = 'k', long = "neighbors", default_value_t = 10)]
    pub k: usize,

    /// Flag a point when its smallest local eigenvalue is below this value.
    #[arg(short = 't', long, default_value_t = 0.01)]
    pub threshold: f64,

    /// Degree of the fitted margin polynomial.
    #[arg(short = 'd', long, default_value_t = 5)]
    pub degree: usize,

    /// Number of samples in the exported curve grid.
    #[arg(long, default_value_t = 500)]
    pub grid: usize,

    /// Export edge candidates to CSV.
    #[arg(long = "export-edges", value_name = "CSV")]
    pub export_edges: Option<PathBuf>,

    /// Export curve (parameters + coefficients + sampled grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

/// Options for synthetic cloud generation.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of points to generate.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of coordinate noise (mm).
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,
}

/// Options for evaluating a saved curve.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Curve JSON file produced by `margin detect --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Start of the x-range (defaults to the fitted minimum).
    #[arg(long, allow_hyphen_values = true)]
    pub x_min: Option<f64>,

    /// End of the x-range (defaults to the fitted maximum).
    #[arg(long, allow_hyphen_values = true)]
    pub x_max: Option<f64>,

    /// Number of evaluation points.
    #[arg(long, default_value_t = 21)]
    pub steps: usize,
}
