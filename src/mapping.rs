use nalgebra::Point3;

use crate::error::{ResampleError, Result};

/// A precomputed coordinate correspondence: for each element of a target
/// representation (a voxel or a vertex), the matching coordinate in the
/// source representation's space.
///
/// The raw coordinates are kept as supplied. A coordinate exactly equal to
/// the zero vector is the sentinel for "no valid correspondence", which
/// `entry` exposes as `None`. A genuine correspondence at the origin can't be
/// told apart from the sentinel.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MappingTable {
    coordinates: Vec<Point3<f32>>,
}

impl MappingTable {
    pub fn from_coordinates(coordinates: Vec<Point3<f32>>) -> Self {
        MappingTable { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Raw coordinates, sentinels included.
    pub fn coordinates(&self) -> &[Point3<f32>] {
        &self.coordinates
    }

    /// The correspondence for `index`, `None` if the entry holds the zero
    /// sentinel.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn entry(&self, index: usize) -> Option<Point3<f32>> {
        let coordinate = self.coordinates[index];
        if is_sentinel(&coordinate) {
            None
        } else {
            Some(coordinate)
        }
    }

    /// All correspondences in element order, sentinels as `None`.
    pub fn entries<'a>(&'a self) -> impl Iterator<Item = Option<Point3<f32>>> + 'a {
        (0..self.coordinates.len()).map(move |index| self.entry(index))
    }

    pub fn valid_count(&self) -> usize {
        self.coordinates.iter().filter(|c| !is_sentinel(c)).count()
    }

    /// The first `required` coordinates. Mapping tables defined at the finest
    /// resolution are reused for coarser targets this way.
    pub fn leading(&self, required: usize) -> Result<&[Point3<f32>]> {
        if self.coordinates.len() < required {
            return Err(ResampleError::InsufficientMapping {
                required,
                available: self.coordinates.len(),
            });
        }

        Ok(&self.coordinates[..required])
    }

    /// Checks the table covers exactly `element_count` target elements.
    pub fn ensure_len(&self, element_count: usize) -> Result<()> {
        if self.coordinates.len() == element_count {
            Ok(())
        } else {
            Err(ResampleError::GridMismatch {
                expected: element_count,
                actual: self.coordinates.len(),
            })
        }
    }
}

fn is_sentinel(coordinate: &Point3<f32>) -> bool {
    coordinate.x == 0.0 && coordinate.y == 0.0 && coordinate.z == 0.0
}

/// Mapping tables for both hemispheres of one projection direction.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereMappings {
    pub left: MappingTable,
    pub right: MappingTable,
}
