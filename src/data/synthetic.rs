//! Synthetic point clouds of a prepared tooth.
//!
//! The model is a tapered stump standing on a horizontal shoulder. The margin
//! runs around the stump at a scalloped height `z = A cos(2θ)`:
//!
//! - axial wall: from the margin up to a flat occlusal table, radius shrinking
//!   with height
//! - occlusal table: a disc closing the top of the wall
//! - shoulder: a flat ring just outside the margin
//! - gingival wall: a vertical band below the shoulder
//!
//! Samples are drawn per surface (not area-weighted) and jittered with isotropic
//! Gaussian noise. The same config always yields the same cloud.

use std::f64::consts::TAU;

use nalgebra::Point3;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// Margin radius (mm).
const MARGIN_RADIUS: f64 = 4.0;
/// Scallop amplitude of the margin height (mm).
const SCALLOP: f64 = 0.6;
/// Height of the occlusal table (mm).
const TABLE_HEIGHT: f64 = 5.0;
/// Radius lost per mm of wall height.
const TAPER: f64 = 0.12;
const SHOULDER_WIDTH: f64 = 0.8;
const GINGIVAL_DEPTH: f64 = 3.0;

/// Share of samples per surface: wall, table, shoulder, gingival wall.
const SURFACE_SHARES: [f64; 4] = [0.5, 0.2, 0.15, 0.15];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub count: usize,
    pub seed: u64,
    /// Standard deviation of the per-coordinate noise (mm).
    pub noise: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            seed: 42,
            noise: 0.01,
        }
    }
}

/// Height of the margin at angle `theta`.
pub fn margin_height(theta: f64) -> f64 {
    SCALLOP * (2.0 * theta).cos()
}

/// Generate a synthetic preparation cloud.
pub fn generate_preparation(config: &SynthConfig) -> Result<Vec<Point3<f64>>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be a non-negative finite number."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let counts = surface_counts(config.count);
    let mut points = Vec::with_capacity(config.count);

    for (surface, &n) in counts.iter().enumerate() {
        for _ in 0..n {
            let theta = rng.gen_range(0.0..TAU);
            let u: f64 = rng.gen_range(0.0..1.0);
            let z_m = margin_height(theta);

            let (r, z) = match surface {
                0 => {
                    let z = z_m + u * (TABLE_HEIGHT - z_m);
                    (MARGIN_RADIUS - TAPER * (z - z_m), z)
                }
                1 => {
                    let r_top = MARGIN_RADIUS - TAPER * (TABLE_HEIGHT - z_m);
                    (u.sqrt() * r_top, TABLE_HEIGHT)
                }
                2 => (MARGIN_RADIUS + u * SHOULDER_WIDTH, z_m),
                _ => (MARGIN_RADIUS + SHOULDER_WIDTH, z_m - u * GINGIVAL_DEPTH),
            };

            points.push(Point3::new(
                r * theta.cos() + noise.sample(&mut rng),
                r * theta.sin() + noise.sample(&mut rng),
                z + noise.sample(&mut rng),
            ));
        }
    }

    Ok(points)
}

/// Split `total` across surfaces by share; the remainder goes to the wall.
fn surface_counts(total: usize) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for (count, share) in counts.iter_mut().zip(SURFACE_SHARES).skip(1) {
        *count = (total as f64 * share).floor() as usize;
    }
    counts[0] = total - counts[1..].iter().sum::<usize>();
    counts
}
