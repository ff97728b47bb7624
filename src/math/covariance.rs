//! Local shape descriptors: covariance of a neighbourhood and its spectrum.

use nalgebra::{Matrix3, Point3, Vector3};

/// Sample covariance of `points` about their centroid.
///
/// Uses the `n - 1` normalization. Fewer than two points carry no spread and give
/// the zero matrix.
pub fn covariance(points: &[Point3<f64>]) -> Matrix3<f64> {
    let n = points.len();
    if n < 2 {
        return Matrix3::zeros();
    }

    let centroid: Vector3<f64> = points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n as f64;

    let mut cov = Matrix3::zeros();
    for p in points {
        let diff = p.coords - centroid;
        cov += diff * diff.transpose();
    }

    cov / (n - 1) as f64
}

/// Eigenvalues of a symmetric matrix, ascending.
///
/// A matrix with a non-finite entry (an overflowed covariance) yields `NaN` for
/// all three values.
pub fn sorted_eigenvalues(matrix: &Matrix3<f64>) -> [f64; 3] {
    if !matrix.iter().all(|v| v.is_finite()) {
        return [f64::NAN; 3];
    }
    let ev = matrix.symmetric_eigenvalues();
    let mut out = [ev[0], ev[1], ev[2]];
    out.sort_by(f64::total_cmp);
    out
}
