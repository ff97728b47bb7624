//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the classification/fitting code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::DetectRun;
use crate::domain::{CurveGrid, CurveModel, RunConfig};

/// Format the full run summary (input stats + parameters + fit diagnostics).
pub fn format_run_summary(run: &DetectRun, config: &RunConfig) -> String {
    let cloud = &run.cloud;
    let result = &run.output;
    let stats = &result.stats;
    let params = &config.params;

    let mut out = String::new();
    out.push_str("=== margin - Preparation Margin Detection ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!(
        "Points: n={} (rows read={}, skipped={})\n",
        stats.n_points,
        cloud.rows_read,
        cloud.row_errors.len()
    ));
    out.push_str(&format!(
        "Bounds: x=[{:.3}, {:.3}] y=[{:.3}, {:.3}] z=[{:.3}, {:.3}]\n",
        stats.min.x, stats.max.x, stats.min.y, stats.max.y, stats.min.z, stats.max.z
    ));
    out.push_str(&format!(
        "Params: k={} | threshold={} | degree={}\n",
        params.k, params.threshold, params.degree
    ));

    let share = 100.0 * result.edges.len() as f64 / stats.n_points.max(1) as f64;
    out.push_str(&format!(
        "\nEdge candidates: {} ({share:.1}% of points)\n",
        result.edges.len()
    ));

    out.push_str("\nMargin curve y = f(x):\n");
    out.push_str(&format!("  {}\n", format_polynomial(&result.fit.model)));
    out.push_str(&format!(
        "  x-range=[{:.4}, {:.4}] | SSE={:.6} | RMSE={:.6} | n={}\n",
        result.fit.x_min, result.fit.x_max, result.fit.quality.sse, result.fit.quality.rmse, result.fit.quality.n
    ));

    for e in cloud.row_errors.iter().take(5) {
        out.push_str(&format!("  skipped line {}: {}\n", e.line, e.message));
    }
    if cloud.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more skipped rows\n", cloud.row_errors.len() - 5));
    }

    out
}

/// Render the polynomial with one term per coefficient, highest power first.
pub fn format_polynomial(model: &CurveModel) -> String {
    let terms: Vec<String> = model
        .coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let power = model.coefficients.len() - 1 - i;
            match power {
                0 => format!("{c:+.6e}"),
                1 => format!("{c:+.6e}·x"),
                p => format!("{c:+.6e}·x^{p}"),
            }
        })
        .collect();
    terms.join(" ")
}

/// Format an evaluated curve as an `x,y` table.
pub fn format_grid(grid: &CurveGrid) -> String {
    let mut out = String::from("x,y\n");
    for (x, y) in grid.x.iter().zip(grid.y.iter()) {
        out.push_str(&format!("{x:.6},{y:.6}\n"));
    }
    out
}
