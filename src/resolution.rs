//! Reconciliation of surface fields supplied at a coarser mesh resolution
//! with the canonical mesh.

use crate::error::{ResampleError, Result};
use crate::mesh::{Resolution, SurfaceMesh};
use crate::spatial_index::{BuildSpatialIndex, KdTreeIndex};

/// Brings `field` to canonical resolution using a k-d tree index. See
/// `upsample_to_canonical_with_index`.
pub fn upsample_to_canonical(
    field: &[f32],
    low_resolution_mesh: &SurfaceMesh,
    canonical_mesh: &SurfaceMesh,
) -> Result<Vec<f32>> {
    upsample_to_canonical_with_index::<KdTreeIndex>(field, low_resolution_mesh, canonical_mesh)
}

/// Brings `field` to canonical resolution.
///
/// A canonical field is returned as is. Otherwise every canonical vertex
/// copies the value of the nearest vertex of `low_resolution_mesh`, the mesh
/// the field is defined on. Values are never blended, so label fields stay
/// valid labels.
///
/// Fails if the field length is not a canonical vertex count, or if the meshes
/// don't match the field and the canonical resolution.
pub fn upsample_to_canonical_with_index<I: BuildSpatialIndex>(
    field: &[f32],
    low_resolution_mesh: &SurfaceMesh,
    canonical_mesh: &SurfaceMesh,
) -> Result<Vec<f32>> {
    let resolution = Resolution::from_vertex_count(field.len())?;
    if resolution == Resolution::Canonical {
        return Ok(field.to_vec());
    }

    if low_resolution_mesh.vertex_count() != field.len() {
        return Err(ResampleError::GridMismatch {
            expected: field.len(),
            actual: low_resolution_mesh.vertex_count(),
        });
    }
    if canonical_mesh.vertex_count() != Resolution::Canonical.vertex_count() {
        return Err(ResampleError::GridMismatch {
            expected: Resolution::Canonical.vertex_count(),
            actual: canonical_mesh.vertex_count(),
        });
    }

    log::debug!(
        "Upsampling {} field to {} by nearest vertex",
        resolution,
        Resolution::Canonical
    );

    let index = I::build(low_resolution_mesh.vertices());
    let nearest = index.nearest_batch(canonical_mesh.vertices());

    Ok(nearest.into_iter().map(|i| field[i]).collect())
}
