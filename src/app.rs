//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - runs detection + fitting
//! - prints reports and writes optional exports

use clap::Parser;
use log::info;

use crate::cli::{Command, DetectArgs, EvalArgs, SynthArgs};
use crate::data::{SynthConfig, generate_preparation};
use crate::domain::{MarginParams, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `margin` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; it only supplies RUST_LOG overrides.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Detect(args) => handle_detect(args),
        Command::Synth(args) => handle_synth(args),
        Command::Eval(args) => handle_eval(args),
    }
}

fn handle_detect(args: DetectArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_detect(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));

    if let Some(path) = &config.export_edges {
        crate::io::export::write_edges_csv(path, &run.output.edges)?;
        info!("wrote {} edge candidates to '{}'", run.output.edges.len(), path.display());
    }
    if let Some(path) = &config.export_curve {
        let curve = crate::io::curve::curve_file(&run.output, &config.params, config.grid_points);
        crate::io::curve::write_curve_json(path, &curve)?;
        info!("wrote curve to '{}'", path.display());
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = SynthConfig {
        count: args.count,
        seed: args.seed,
        noise: args.noise,
    };
    let points = generate_preparation(&config)?;
    crate::io::export::write_points_csv(&args.output, &points)?;

    println!("Wrote {} points to {}", points.len(), args.output.display());
    Ok(())
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;

    let x_min = args.x_min.unwrap_or(curve.fit.x_min);
    let x_max = args.x_max.unwrap_or(curve.fit.x_max);
    if !(x_min.is_finite() && x_max.is_finite()) {
        return Err(AppError::new(2, "x-range must be finite."));
    }

    let grid = curve.fit.model.sample_grid(x_min, x_max, args.steps.max(2));
    print!("{}", crate::report::format_grid(&grid));
    Ok(())
}

pub fn run_config_from_args(args: &DetectArgs) -> RunConfig {
    RunConfig {
        input: args.input.clone(),
        params: MarginParams {
            k: args.k,
            threshold: args.threshold,
            degree: args.degree,
        },
        grid_points: args.grid,
        export_edges: args.export_edges.clone(),
        export_curve: args.export_curve.clone(),
    }
}
