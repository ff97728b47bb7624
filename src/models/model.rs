//! Polynomial model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given `x` (for least squares)
//! - predict `y(x)` given coefficients (for residuals and curve grids)
//!
//! Both use the highest-order-first convention: a row for degree `d` is
//! `[x^d, x^(d-1), ..., x, 1]`.

/// Fill a design row of monomials of `x`, highest power first.
///
/// The degree is implied by `out.len() - 1`. An empty `out` is left untouched.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    let mut power = 1.0;
    for slot in out.iter_mut().rev() {
        *slot = power;
        power *= x;
    }
}

/// Predict `y(x)` with Horner's scheme.
pub fn predict(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}
