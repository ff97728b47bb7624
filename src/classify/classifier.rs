//! Edge-candidate classification from local covariance.
//!
//! For every point `p` of the set:
//! - take its `k` nearest neighbours (including `p` itself)
//! - compute their covariance about the neighbourhood centroid
//! - flag `p` when the smallest eigenvalue is strictly below `threshold`
//!
//! A small smallest eigenvalue means the neighbourhood is squeezed along one
//! direction. Ridge-like neighbourhoods along the margin produce it, and so do
//! flat patches of the surface; the test does not distinguish the two.
//!
//! Per-point work is independent and runs on the rayon pool. Eigenvalues are
//! collected by point index, so the output order never depends on scheduling.
//! A neighbourhood whose covariance overflows is an error, not a non-candidate.

use log::{debug, info};
use nalgebra::Point3;
use rayon::prelude::*;

use crate::domain::EdgeCandidates;
use crate::error::{InputKind, MarginError, MarginResult};
use crate::math::{covariance, sorted_eigenvalues};
use crate::spatial::{NeighborIndex, PointIndex};

/// Classify `points` using a spatial index built for them.
pub fn classify(points: &[Point3<f64>], k: usize, threshold: f64) -> MarginResult<EdgeCandidates> {
    validate_inputs(points, k, threshold)?;

    let index = PointIndex::build(points);
    debug!(
        "classifying {} points with {} (k={k}, threshold={threshold})",
        points.len(),
        index.backend_name()
    );

    classify_indexed(points, &index, k, threshold)
}

/// Classify `points` against a caller-supplied index over the same points.
pub fn classify_with_index<I>(
    points: &[Point3<f64>],
    index: &I,
    k: usize,
    threshold: f64,
) -> MarginResult<EdgeCandidates>
where
    I: NeighborIndex + ?Sized,
{
    validate_inputs(points, k, threshold)?;
    if index.len() != points.len() {
        return Err(MarginError::invalid(format!(
            "index covers {} points but {} were supplied",
            index.len(),
            points.len()
        )));
    }

    classify_indexed(points, index, k, threshold)
}

/// Ascending eigenvalues of the covariance of point `i`'s neighbourhood.
///
/// # Panics
/// Panics if `i` is out of bounds for `points`.
pub fn local_eigenvalues<I>(points: &[Point3<f64>], index: &I, i: usize, k: usize) -> [f64; 3]
where
    I: NeighborIndex + ?Sized,
{
    let neighbourhood: Vec<Point3<f64>> = index
        .query_k_nearest(&points[i], k)
        .into_iter()
        .map(|j| points[j])
        .collect();
    sorted_eigenvalues(&covariance(&neighbourhood))
}

fn classify_indexed<I>(
    points: &[Point3<f64>],
    index: &I,
    k: usize,
    threshold: f64,
) -> MarginResult<EdgeCandidates>
where
    I: NeighborIndex + ?Sized,
{
    let smallest: Vec<f64> = (0..points.len())
        .into_par_iter()
        .map(|i| local_eigenvalues(points, index, i, k)[0])
        .collect();

    // An overflowed covariance would otherwise read as "not an edge".
    if let Some(i) = smallest.iter().position(|v| !v.is_finite()) {
        return Err(MarginError::invalid(format!(
            "local covariance of point {i} overflows; coordinates are too large to classify"
        )));
    }

    let mut edges = EdgeCandidates::default();
    for (i, lambda) in smallest.into_iter().enumerate() {
        if lambda < threshold {
            edges.indices.push(i);
            edges.points.push(points[i]);
        }
    }

    info!(
        "{} of {} points are edge candidates (k={k}, threshold={threshold})",
        edges.len(),
        points.len()
    );
    Ok(edges)
}

fn validate_inputs(points: &[Point3<f64>], k: usize, threshold: f64) -> MarginResult<()> {
    if k == 0 {
        return Err(MarginError::invalid("k must be at least 1"));
    }
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(MarginError::invalid(format!(
            "threshold must be a positive finite number, got {threshold}"
        )));
    }
    if points.len() < k {
        return Err(MarginError::InsufficientInput {
            kind: InputKind::PointSet,
            required: k,
            actual: points.len(),
        });
    }
    if let Some(i) = points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(MarginError::invalid(format!("point {i} has a non-finite coordinate")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::BruteForceIndex;

    /// A noisy slab: points spread over x/y, with z jitter of amplitude `dz`.
    fn slab(n_side: usize, spacing: f64, dz: f64) -> Vec<Point3<f64>> {
        (0..n_side)
            .flat_map(|i| {
                (0..n_side).map(move |j| {
                    let t = (i * n_side + j) as f64;
                    Point3::new(
                        i as f64 * spacing + (t * 0.618_034).fract() * 1e-3,
                        j as f64 * spacing + (t * 0.414_214).fract() * 1e-3,
                        ((t * 0.732_051).fract() - 0.5) * dz,
                    )
                })
            })
            .collect()
    }

    #[test]
    fn coincident_points_are_all_candidates() {
        let points = vec![Point3::new(1.5, -2.0, 0.25); 10];
        let edges = classify(&points, 10, 1e-12).unwrap();
        assert_eq!(edges.indices, (0..10).collect::<Vec<_>>());
        assert_eq!(edges.points, points);
    }

    #[test]
    fn flat_slab_is_flagged_and_thick_block_is_not() {
        let flat = slab(12, 0.05, 1e-4);
        let edges = classify(&flat, 10, 0.01).unwrap();
        assert_eq!(edges.len(), flat.len());

        // Same footprint but each point also spread over a unit of depth.
        let thick = slab(12, 1.0, 4.0);
        let edges = classify(&thick, 10, 0.01).unwrap();
        assert!(edges.len() < thick.len());
    }

    #[test]
    fn result_preserves_input_order() {
        let mut points = slab(8, 0.05, 1e-4);
        points.extend(slab(8, 1.0, 4.0).into_iter().map(|p| p + nalgebra::Vector3::new(50.0, 0.0, 0.0)));

        let edges = classify(&points, 8, 0.01).unwrap();
        assert!(edges.indices.windows(2).all(|w| w[0] < w[1]));
        for (&i, p) in edges.indices.iter().zip(edges.points.iter()) {
            assert_eq!(points[i], *p);
        }
    }

    #[test]
    fn collinear_neighbourhood_has_two_zero_eigenvalues() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let index = BruteForceIndex::new(&points);
        let ev = local_eigenvalues(&points, &index, 1, 3);
        assert!(ev[0].abs() < 1e-12);
        assert!(ev[1].abs() < 1e-12);
        assert!((ev[2] - 1.0).abs() < 1e-12);

        let edges = classify_with_index(&points, &index, 3, 1e-9).unwrap();
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        // Every neighbourhood is the whole octahedron, so all points share one spectrum.
        let points = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let index = BruteForceIndex::new(&points);
        let smallest = local_eigenvalues(&points, &index, 0, 6)[0];
        assert!(smallest > 0.0);

        let at = classify_with_index(&points, &index, 6, smallest).unwrap();
        assert!(at.is_empty());

        let above = classify_with_index(&points, &index, 6, smallest * (1.0 + 1e-9)).unwrap();
        assert_eq!(above.len(), 6);
    }

    #[test]
    fn rejects_too_few_points() {
        let points = vec![Point3::origin(); 4];
        let index = BruteForceIndex::new(&points);
        let err = classify_with_index(&points, &index, 10, 0.01).unwrap_err();
        assert_eq!(
            err,
            MarginError::InsufficientInput {
                kind: InputKind::PointSet,
                required: 10,
                actual: 4,
            }
        );
        assert!(matches!(
            classify(&[], 1, 0.01),
            Err(MarginError::InsufficientInput { actual: 0, .. })
        ));
    }

    #[test]
    fn rejects_bad_parameters_and_coordinates() {
        let points = slab(4, 0.1, 0.0);
        assert!(matches!(
            classify(&points, 0, 0.01),
            Err(MarginError::InvalidParameter { .. })
        ));
        assert!(matches!(
            classify(&points, 4, 0.0),
            Err(MarginError::InvalidParameter { .. })
        ));

        let mut bad = points.clone();
        bad[3].y = f64::NAN;
        assert!(matches!(
            classify(&bad, 4, 0.01),
            Err(MarginError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_index_built_for_other_points() {
        let points = slab(4, 0.1, 0.0);
        let other = slab(3, 0.1, 0.0);
        let index = BruteForceIndex::new(&other);
        assert!(classify_with_index(&points, &index, 4, 0.01).is_err());
    }

    #[test]
    fn parallel_result_matches_sequential_evaluation() {
        let points = slab(14, 0.3, 0.5);
        let index = BruteForceIndex::new(&points);
        let edges = classify_with_index(&points, &index, 10, 0.01).unwrap();

        let sequential: Vec<usize> = (0..points.len())
            .filter(|&i| local_eigenvalues(&points, &index, i, 10)[0] < 0.01)
            .collect();
        assert_eq!(edges.indices, sequential);
    }

    #[test]
    fn overflowing_neighbourhood_is_an_error_not_a_miss() {
        let points: Vec<Point3<f64>> = (0..20)
            .map(|i| {
                let t = i as f64;
                Point3::new(1e160 * (1.0 + t), 1e160 * (t * 0.618_034).fract(), 0.0)
            })
            .collect();
        let index = BruteForceIndex::new(&points);
        let err = classify_with_index(&points, &index, 10, 0.01).unwrap_err();
        assert!(matches!(err, MarginError::InvalidParameter { .. }));
        assert!(err.to_string().contains("overflows"));
    }
}
