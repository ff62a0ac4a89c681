use nalgebra::{Matrix4, Vector3};

use crate::convert::cast_usize;
use crate::error::{ResampleError, Result};
use crate::transform::VoxelTransform;

/// A regular 3D grid of voxel values.
///
/// The values are stored in a linear buffer with the first axis varying
/// fastest: the voxel at `(i, j, k)` lives at `i + j * d0 + k * d0 * d1`.
/// Mapping tables and cortical masks addressing voxels must use the same
/// order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VoxelGrid<T> {
    dimensions: Vector3<u32>,
    values: Vec<T>,
}

impl<T: Copy> VoxelGrid<T> {
    /// Define a new grid of `dimensions` voxels, all set to `value`.
    pub fn filled(dimensions: &Vector3<u32>, value: T) -> Self {
        let len = cast_usize(dimensions.x) * cast_usize(dimensions.y) * cast_usize(dimensions.z);

        VoxelGrid {
            dimensions: *dimensions,
            values: vec![value; len],
        }
    }

    /// Wraps an existing linear buffer of voxel values.
    pub fn from_values(dimensions: &Vector3<u32>, values: Vec<T>) -> Result<Self> {
        let expected =
            cast_usize(dimensions.x) * cast_usize(dimensions.y) * cast_usize(dimensions.z);
        if values.len() != expected {
            return Err(ResampleError::GridMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(VoxelGrid {
            dimensions: *dimensions,
            values,
        })
    }

    pub fn dimensions(&self) -> Vector3<u32> {
        self.dimensions
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value at already validated grid indices.
    pub(crate) fn value_at_indices(&self, i: usize, j: usize, k: usize) -> T {
        let dx = cast_usize(self.dimensions.x);
        let dy = cast_usize(self.dimensions.y);
        self.values[i + j * dx + k * dx * dy]
    }

    /// Creates a grid of the same dimensions with every value transformed.
    pub fn map<U, F>(&self, f: F) -> VoxelGrid<U>
    where
        F: FnMut(&T) -> U,
    {
        VoxelGrid {
            dimensions: self.dimensions,
            values: self.values.iter().map(f).collect(),
        }
    }
}

/// A volumetric field: one or more frames of voxel values sharing the same
/// grid, placed in physical space by a voxel-to-physical affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    frames: Vec<VoxelGrid<f32>>,
    affine: Matrix4<f64>,
}

impl Volume {
    /// Creates a multi-frame volume.
    ///
    /// Fails if there are no frames or if the frames differ in dimensions.
    pub fn new(frames: Vec<VoxelGrid<f32>>, affine: Matrix4<f64>) -> Result<Self> {
        let first_frame = frames.first().ok_or(ResampleError::NoFrames)?;
        let dimensions = first_frame.dimensions();
        let expected = first_frame.len();
        for frame in &frames {
            if frame.dimensions() != dimensions {
                return Err(ResampleError::GridMismatch {
                    expected,
                    actual: frame.len(),
                });
            }
        }

        Ok(Volume { frames, affine })
    }

    /// Creates a single-frame volume.
    pub fn from_grid(grid: VoxelGrid<f32>, affine: Matrix4<f64>) -> Self {
        Volume {
            frames: vec![grid],
            affine,
        }
    }

    pub fn frames(&self) -> &[VoxelGrid<f32>] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn dimensions(&self) -> Vector3<u32> {
        self.frames[0].dimensions()
    }

    /// The voxel-to-physical transform.
    pub fn affine(&self) -> &Matrix4<f64> {
        &self.affine
    }

    pub fn transform(&self) -> Result<VoxelTransform> {
        VoxelTransform::new(self.affine)
    }
}

/// Binary grid of the voxels considered valid cortex.
#[derive(Debug, Clone, PartialEq)]
pub struct CorticalMask {
    grid: VoxelGrid<bool>,
}

impl CorticalMask {
    pub fn from_grid(grid: VoxelGrid<bool>) -> Self {
        CorticalMask { grid }
    }

    /// Voxels with a nonzero value in the first frame of `volume` are cortex.
    pub fn from_volume(volume: &Volume) -> Self {
        CorticalMask {
            grid: volume.frames[0].map(|value| *value != 0.0),
        }
    }

    pub fn dimensions(&self) -> Vector3<u32> {
        self.grid.dimensions()
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn is_cortex(&self, index: usize) -> bool {
        self.grid.values()[index]
    }

    pub fn cortex_voxel_count(&self) -> usize {
        self.grid.values().iter().filter(|v| **v).count()
    }

    /// Zeroes every value outside the cortex.
    ///
    /// # Panics
    /// Panics if `values` doesn't have one value per mask voxel.
    pub fn apply(&self, values: &mut [f32]) {
        assert_eq!(
            values.len(),
            self.grid.len(),
            "Masked values must match the mask grid"
        );
        for (value, is_cortex) in values.iter_mut().zip(self.grid.values()) {
            if !is_cortex {
                *value = 0.0;
            }
        }
    }

    /// Counts voxels where the nonzero pattern of `values` disagrees with the
    /// mask.
    pub fn count_mismatches(&self, values: &[f32]) -> usize {
        values
            .iter()
            .zip(self.grid.values())
            .filter(|(value, is_cortex)| (**value != 0.0) != **is_cortex)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_grid_first_axis_varies_fastest() {
        let grid =
            VoxelGrid::from_values(&Vector3::new(2, 3, 4), (0..24).map(|n| n as f32).collect())
                .unwrap();

        assert_eq!(grid.value_at_indices(1, 0, 0), 1.0);
        assert_eq!(grid.value_at_indices(0, 1, 0), 2.0);
        assert_eq!(grid.value_at_indices(0, 0, 1), 6.0);
        assert_eq!(grid.value_at_indices(1, 2, 3), 23.0);
    }

    #[test]
    fn test_voxel_grid_from_values_rejects_wrong_length() {
        let grid = VoxelGrid::from_values(&Vector3::new(2, 2, 2), vec![0.0f32; 7]);

        assert_eq!(
            grid,
            Err(ResampleError::GridMismatch {
                expected: 8,
                actual: 7,
            })
        );
    }

    #[test]
    fn test_volume_new_rejects_frames_of_different_dimensions() {
        let frames = vec![
            VoxelGrid::filled(&Vector3::new(2, 2, 2), 0.0),
            VoxelGrid::filled(&Vector3::new(2, 2, 1), 0.0),
        ];

        assert_eq!(
            Volume::new(frames, Matrix4::identity()),
            Err(ResampleError::GridMismatch {
                expected: 8,
                actual: 4,
            })
        );
    }

    #[test]
    fn test_volume_new_rejects_empty_frame_list() {
        assert_eq!(
            Volume::new(Vec::new(), Matrix4::identity()),
            Err(ResampleError::NoFrames)
        );
    }

    #[test]
    fn test_cortical_mask_apply_is_idempotent() {
        let mask = CorticalMask::from_grid(
            VoxelGrid::from_values(&Vector3::new(4, 1, 1), vec![true, false, true, false]).unwrap(),
        );
        let mut values = vec![1.0, 2.0, 3.0, 4.0];

        mask.apply(&mut values);
        let once = values.clone();
        mask.apply(&mut values);

        assert_eq!(once, vec![1.0, 0.0, 3.0, 0.0]);
        assert_eq!(values, once);
    }

    #[test]
    fn test_cortical_mask_count_mismatches() {
        let mask = CorticalMask::from_grid(
            VoxelGrid::from_values(&Vector3::new(4, 1, 1), vec![true, false, true, false]).unwrap(),
        );

        assert_eq!(mask.count_mismatches(&[1.0, 1.0, 0.0, 0.0]), 2);
        assert_eq!(mask.cortex_voxel_count(), 2);
    }

    #[test]
    fn test_cortical_mask_from_volume_uses_nonzero_voxels() {
        let grid = VoxelGrid::from_values(&Vector3::new(3, 1, 1), vec![0.0, 0.5, -1.0]).unwrap();
        let mask = CorticalMask::from_volume(&Volume::from_grid(grid, Matrix4::identity()));

        assert!(!mask.is_cortex(0));
        assert!(mask.is_cortex(1));
        assert!(mask.is_cortex(2));
    }
}
