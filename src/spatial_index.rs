//! Nearest point queries against a fixed reference point set.
//!
//! The resampling algorithms only depend on the `SpatialIndex` contract, so
//! the k-d tree can be swapped for any other structure answering the same
//! queries, e.g. the exhaustive `LinearScanIndex` used to cross-check it.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;
use rayon::prelude::*;

use crate::convert::cast_usize;

/// Answers nearest point queries. Indices refer to the order of the points
/// the index was built from. Once built, the index is read-only and may be
/// queried from multiple threads at once.
pub trait SpatialIndex: Sync {
    /// Index of the reference point closest to `query`, `None` for an empty
    /// reference set. Ties are resolved by the implementation, but
    /// consistently for the same query.
    fn nearest(&self, query: &Point3<f32>) -> Option<usize>;

    /// Number of reference points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest reference point for each of the `queries`, in query order.
    /// Empty for an empty reference set.
    fn nearest_batch(&self, queries: &[Point3<f32>]) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }
        queries
            .par_iter()
            .map(|query| {
                self.nearest(query)
                    .expect("Non-empty index always has a nearest point")
            })
            .collect()
    }
}

/// Construction of a spatial index over a reference point set.
pub trait BuildSpatialIndex: SpatialIndex + Sized {
    fn build(points: &[Point3<f32>]) -> Self;
}

/// Spatial index backed by an immutable k-d tree.
pub struct KdTreeIndex {
    tree: Option<ImmutableKdTree<f32, 3>>,
    len: usize,
}

impl SpatialIndex for KdTreeIndex {
    fn nearest(&self, query: &Point3<f32>) -> Option<usize> {
        self.tree.as_ref().map(|tree| {
            let nearest = tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y, query.z]);
            cast_usize(nearest.item)
        })
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl BuildSpatialIndex for KdTreeIndex {
    fn build(points: &[Point3<f32>]) -> Self {
        if points.is_empty() {
            return KdTreeIndex { tree: None, len: 0 };
        }
        let entries: Vec<[f32; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();

        KdTreeIndex {
            tree: Some(ImmutableKdTree::new_from_slice(&entries)),
            len: points.len(),
        }
    }
}

/// Spatial index comparing every query against every reference point. Ties
/// resolve to the lowest index.
#[derive(Debug, Clone)]
pub struct LinearScanIndex {
    points: Vec<Point3<f32>>,
}

impl SpatialIndex for LinearScanIndex {
    fn nearest(&self, query: &Point3<f32>) -> Option<usize> {
        let mut closest: Option<(usize, f32)> = None;
        for (index, point) in self.points.iter().enumerate() {
            let distance_squared = nalgebra::distance_squared(point, query);
            match closest {
                Some((_, closest_distance_squared))
                    if closest_distance_squared <= distance_squared => {}
                _ => closest = Some((index, distance_squared)),
            }
        }

        closest.map(|(index, _)| index)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

impl BuildSpatialIndex for LinearScanIndex {
    fn build(points: &[Point3<f32>]) -> Self {
        LinearScanIndex {
            points: points.to_vec(),
        }
    }
}
