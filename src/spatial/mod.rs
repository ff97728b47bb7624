//! Read-only k-nearest-neighbour queries over a point set.
//!
//! The classifier only needs one operation, `query_k_nearest`, so the index sits
//! behind the [`NeighborIndex`] trait. Two backends:
//!
//! - [`KdIndex`]: a `kiddo` k-d tree, used for real scans.
//! - [`BruteForceIndex`]: an exact linear scan. Used when the k-d tree cannot be
//!   built safely, and as a reference in tests.
//!
//! `kiddo` panics when a leaf must be split but every item in it shares the same
//! coordinate on the split axis. That needs more identical values on one axis than
//! a bucket holds, so [`PointIndex::build`] counts them first and falls back to the
//! linear scan when the tree could hit it (synthetic grids, flattened scans).

use kiddo::{KdTree, SquaredEuclidean};
use log::{debug, warn};
use nalgebra::Point3;

/// Items per leaf in `kiddo::KdTree<f64, 3>`.
const KD_BUCKET_SIZE: usize = 32;

/// A read-only spatial index.
///
/// Implementations must be shareable across worker threads.
pub trait NeighborIndex: Sync {
    /// Indices of the `k` points nearest to `point`, nearest first.
    ///
    /// A query point taken from the indexed set is returned as its own nearest
    /// neighbour (or one of its duplicates). Returns fewer than `k` indices only
    /// when the set is smaller than `k`.
    fn query_k_nearest(&self, point: &Point3<f64>, k: usize) -> Vec<usize>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// k-d tree backend.
pub struct KdIndex {
    tree: KdTree<f64, 3>,
    len: usize,
}

impl KdIndex {
    pub fn build(points: &[Point3<f64>]) -> Self {
        let mut tree: KdTree<f64, 3> = KdTree::new();
        for (i, p) in points.iter().enumerate() {
            tree.add(&[p.x, p.y, p.z], i as u64);
        }
        Self {
            tree,
            len: points.len(),
        }
    }
}

impl NeighborIndex for KdIndex {
    fn query_k_nearest(&self, point: &Point3<f64>, k: usize) -> Vec<usize> {
        let query = [point.x, point.y, point.z];
        self.tree
            .nearest_n::<SquaredEuclidean>(&query, k)
            .into_iter()
            .map(|n| n.item as usize)
            .collect()
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Exact linear-scan backend. Equal distances are ordered by index.
pub struct BruteForceIndex<'a> {
    points: &'a [Point3<f64>],
}

impl<'a> BruteForceIndex<'a> {
    pub fn new(points: &'a [Point3<f64>]) -> Self {
        Self { points }
    }
}

impl NeighborIndex for BruteForceIndex<'_> {
    fn query_k_nearest(&self, point: &Point3<f64>, k: usize) -> Vec<usize> {
        let mut dists: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| ((p - point).norm_squared(), i))
            .collect();

        let by_distance =
            |a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));

        let k = k.min(dists.len());
        if k == 0 {
            return Vec::new();
        }
        if k < dists.len() {
            dists.select_nth_unstable_by(k - 1, by_distance);
            dists.truncate(k);
        }
        dists.sort_unstable_by(by_distance);
        dists.into_iter().map(|(_, i)| i).collect()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// The index the classifier builds for a point set.
pub enum PointIndex<'a> {
    KdTree(KdIndex),
    Linear(BruteForceIndex<'a>),
}

impl<'a> PointIndex<'a> {
    /// Build a k-d tree unless the data could trip the tree's bucket splitting.
    pub fn build(points: &'a [Point3<f64>]) -> Self {
        let multiplicity = max_axis_multiplicity(points);
        if multiplicity > KD_BUCKET_SIZE {
            warn!(
                "{multiplicity} points share one coordinate value on an axis; \
                 using linear neighbour search over {} points",
                points.len()
            );
            return PointIndex::Linear(BruteForceIndex::new(points));
        }
        debug!("building k-d tree over {} points", points.len());
        PointIndex::KdTree(KdIndex::build(points))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            PointIndex::KdTree(_) => "k-d tree",
            PointIndex::Linear(_) => "linear scan",
        }
    }
}

impl NeighborIndex for PointIndex<'_> {
    fn query_k_nearest(&self, point: &Point3<f64>, k: usize) -> Vec<usize> {
        match self {
            PointIndex::KdTree(index) => index.query_k_nearest(point, k),
            PointIndex::Linear(index) => index.query_k_nearest(point, k),
        }
    }

    fn len(&self) -> usize {
        match self {
            PointIndex::KdTree(index) => index.len(),
            PointIndex::Linear(index) => index.len(),
        }
    }
}

/// Largest number of points sharing one exact coordinate value on any axis.
fn max_axis_multiplicity(points: &[Point3<f64>]) -> usize {
    let mut worst = 0;
    for axis in 0..3 {
        let mut values: Vec<f64> = points.iter().map(|p| p[axis]).collect();
        values.sort_unstable_by(f64::total_cmp);

        let mut run = 0;
        let mut prev: Option<f64> = None;
        for v in values {
            run = if prev == Some(v) { run + 1 } else { 1 };
            prev = Some(v);
            worst = worst.max(run);
        }
    }
    worst
}
