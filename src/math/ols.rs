//! Rank-checked least squares solver.
//!
//! The curve fitter solves one small dense problem per run:
//!
//! ```text
//! minimize Σ (y_i - v_i^T c)^2
//! ```
//!
//! where `v_i` is a row of monomials of `x_i`.
//!
//! Implementation choices:
//! - Non-finite entries are rejected up front.
//! - Columns are scaled to unit norm before the decomposition. Monomial columns
//!   span many orders of magnitude (`x^5` against `1`), and scaling keeps the
//!   singular values comparable.
//! - We use SVD rather than QR because nalgebra's `QR::solve` is intended for
//!   square systems and will panic for non-square matrices.
//! - Singular values below `rows * eps * σ_max` count as zero. A solution is only
//!   returned when the scaled matrix has full column rank; otherwise the caller
//!   gets the numerical rank so it can report a degenerate fit.

use nalgebra::{DMatrix, DVector};

/// The design matrix does not have full column rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankDeficient {
    pub rank: usize,
    pub cols: usize,
}

/// Solve a least squares problem using SVD on a column-scaled copy of `x`.
pub fn solve_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<DVector<f64>, RankDeficient> {
    let (rows, cols) = x.shape();
    if rows == 0 || cols == 0 {
        return Err(RankDeficient { rank: 0, cols });
    }

    // The iterative SVD does not converge on inf/NaN input.
    if !x.iter().all(|v| v.is_finite()) {
        return Err(RankDeficient { rank: 0, cols });
    }

    let mut scaled = x.clone();
    let mut scale = DVector::<f64>::from_element(cols, 1.0);
    for j in 0..cols {
        // Divide by the largest magnitude first so the norm itself cannot overflow.
        let amax = scaled.column(j).amax();
        if amax == 0.0 {
            continue;
        }
        scaled.column_mut(j).unscale_mut(amax);
        let norm = scaled.column(j).norm();
        scaled.column_mut(j).unscale_mut(norm);
        scale[j] = amax * norm;
    }

    let svd = scaled.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let tol = rows as f64 * f64::EPSILON * sigma_max;
    let rank = svd.rank(tol);
    if rank < cols {
        return Err(RankDeficient { rank, cols });
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|_| RankDeficient { rank, cols })?
        .component_div(&scale);

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(RankDeficient { rank, cols })
    }
}
