use nalgebra::{Matrix4, Point3};

use crate::error::{ResampleError, Result};

/// Conversion between a volume's physical (world) coordinate space and its
/// continuous voxel index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelTransform {
    voxel_to_physical: Matrix4<f64>,
    physical_to_voxel: Matrix4<f64>,
}

impl VoxelTransform {
    /// Creates the transform from a voxel-to-physical affine.
    ///
    /// Fails if the affine can't be inverted.
    pub fn new(voxel_to_physical: Matrix4<f64>) -> Result<Self> {
        let physical_to_voxel = voxel_to_physical
            .try_inverse()
            .ok_or(ResampleError::SingularTransform)?;

        Ok(VoxelTransform {
            voxel_to_physical,
            physical_to_voxel,
        })
    }

    pub fn voxel_to_physical(&self, voxel: &Point3<f64>) -> Point3<f64> {
        self.voxel_to_physical.transform_point(voxel)
    }

    pub fn physical_to_voxel(&self, physical: &Point3<f64>) -> Point3<f64> {
        self.physical_to_voxel.transform_point(physical)
    }

    /// Converts a physical coordinate to the continuous index of the volume's
    /// storage array.
    ///
    /// The volume arrays store the first two voxel axes in swapped order
    /// relative to the affine, so the first two components of the voxel
    /// coordinate are exchanged.
    pub fn physical_to_storage_index(&self, physical: &Point3<f32>) -> Point3<f64> {
        let physical_f64 = Point3::new(
            f64::from(physical.x),
            f64::from(physical.y),
            f64::from(physical.z),
        );

        swap_first_two_axes(&self.physical_to_voxel(&physical_f64))
    }
}

/// Exchanges the first and second component of a coordinate.
pub fn swap_first_two_axes(coordinate: &Point3<f64>) -> Point3<f64> {
    Point3::new(coordinate.y, coordinate.x, coordinate.z)
}
