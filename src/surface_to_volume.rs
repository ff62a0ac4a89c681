//! Projection of per-vertex surface fields of both hemispheres into a voxel
//! grid.

use nalgebra::{DMatrix, Point3};

use crate::error::{ResampleError, Result};
use crate::interpolation::{InterpolationMode, SurfaceFieldEvaluator};
use crate::mapping::{HemisphereMappings, MappingTable};
use crate::mesh::{GeometryVariant, Hemisphere, Resolution};
use crate::provider::MeshProvider;
use crate::resolution;
use crate::spatial_index::{BuildSpatialIndex, KdTreeIndex};
use crate::volume::{CorticalMask, VoxelGrid};

/// Added to every nonzero right hemisphere value of the segmented output, so
/// that left and right labels don't collide. Where both hemispheres are
/// nonzero, the shifted right value replaces the left one.
pub const RIGHT_HEMISPHERE_LABEL_OFFSET: f32 = 1000.0;

/// Per hemisphere count of voxels where the nonzero pattern of the masked
/// field disagrees with the cortical mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MaskMismatch {
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SurfaceToVolumeProjection {
    /// Sum of both masked hemisphere fields.
    pub combined: VoxelGrid<f32>,
    /// Masked left field, overwritten by the right field shifted by
    /// `RIGHT_HEMISPHERE_LABEL_OFFSET` wherever the right field is nonzero.
    pub segmented: VoxelGrid<f32>,
    pub mask_mismatch: MaskMismatch,
}

/// Projects the surface fields of both hemispheres into the grid of the
/// cortical mask. See `project_surface_to_volume_with_index`.
pub fn project_surface_to_volume<M>(
    lh_field: &DMatrix<f32>,
    rh_field: &DMatrix<f32>,
    mode: InterpolationMode,
    mapping: &HemisphereMappings,
    cortical_mask: &CorticalMask,
    meshes: &M,
) -> Result<SurfaceToVolumeProjection>
where
    M: MeshProvider + ?Sized,
{
    project_surface_to_volume_with_index::<KdTreeIndex, M>(
        lh_field,
        rh_field,
        mode,
        mapping,
        cortical_mask,
        meshes,
    )
}

/// Projects the surface fields of both hemispheres into the grid of the
/// cortical mask.
///
/// Each field is a single row of per-vertex values at any supported
/// resolution; coarser fields are upsampled to the canonical sphere first.
/// Every voxel with a valid entry in the hemisphere's mapping takes the field
/// value at the mapped sphere coordinate, all other voxels are zero. Both
/// hemispheres are then zeroed outside the cortex and summed.
///
/// The mappings must have exactly one entry per mask voxel. Sphere meshes are
/// loaded from `meshes`.
pub fn project_surface_to_volume_with_index<I, M>(
    lh_field: &DMatrix<f32>,
    rh_field: &DMatrix<f32>,
    mode: InterpolationMode,
    mapping: &HemisphereMappings,
    cortical_mask: &CorticalMask,
    meshes: &M,
) -> Result<SurfaceToVolumeProjection>
where
    I: BuildSpatialIndex,
    M: MeshProvider + ?Sized,
{
    let lh_values = single_row(lh_field)?;
    let rh_values = single_row(rh_field)?;
    let lh_resolution = Resolution::from_vertex_count(lh_values.len())?;
    let rh_resolution = Resolution::from_vertex_count(rh_values.len())?;
    mapping.left.ensure_len(cortical_mask.len())?;
    mapping.right.ensure_len(cortical_mask.len())?;

    let dimensions = cortical_mask.dimensions();
    log::info!(
        "Projecting surfaces ({} lh, {} rh) to {}x{}x{} voxels in {} mode",
        lh_resolution,
        rh_resolution,
        dimensions.x,
        dimensions.y,
        dimensions.z,
        mode
    );

    let mut left = evaluate_hemisphere::<I, M>(
        Hemisphere::Left,
        &lh_values,
        lh_resolution,
        mode,
        &mapping.left,
        meshes,
    )?;
    let mut right = evaluate_hemisphere::<I, M>(
        Hemisphere::Right,
        &rh_values,
        rh_resolution,
        mode,
        &mapping.right,
        meshes,
    )?;

    cortical_mask.apply(&mut left);
    cortical_mask.apply(&mut right);

    let mask_mismatch = MaskMismatch {
        left: cortical_mask.count_mismatches(&left),
        right: cortical_mask.count_mismatches(&right),
    };
    log::info!(
        "Cortex voxels without a value: {} lh, {} rh (of {})",
        mask_mismatch.left,
        mask_mismatch.right,
        cortical_mask.cortex_voxel_count()
    );

    let combined = left.iter().zip(&right).map(|(l, r)| l + r).collect();
    let segmented = left
        .iter()
        .zip(&right)
        .map(|(l, r)| {
            if *r != 0.0 {
                r + RIGHT_HEMISPHERE_LABEL_OFFSET
            } else {
                *l
            }
        })
        .collect();

    Ok(SurfaceToVolumeProjection {
        combined: VoxelGrid::from_values(&dimensions, combined)?,
        segmented: VoxelGrid::from_values(&dimensions, segmented)?,
        mask_mismatch,
    })
}

fn single_row(field: &DMatrix<f32>) -> Result<Vec<f32>> {
    if field.nrows() != 1 || field.ncols() == 0 {
        return Err(ResampleError::InvalidShape {
            rows: field.nrows(),
            columns: field.ncols(),
        });
    }

    Ok(field.iter().copied().collect())
}

fn evaluate_hemisphere<I, M>(
    hemisphere: Hemisphere,
    field: &[f32],
    resolution: Resolution,
    mode: InterpolationMode,
    mapping: &MappingTable,
    meshes: &M,
) -> Result<Vec<f32>>
where
    I: BuildSpatialIndex,
    M: MeshProvider + ?Sized,
{
    let sphere = meshes.load_mesh(hemisphere, Resolution::Canonical, GeometryVariant::Sphere)?;
    let canonical_field = if resolution == Resolution::Canonical {
        field.to_vec()
    } else {
        let coarse_sphere = meshes.load_mesh(hemisphere, resolution, GeometryVariant::Sphere)?;
        resolution::upsample_to_canonical_with_index::<I>(field, &coarse_sphere, &sphere)?
    };

    let queries: Vec<Option<Point3<f32>>> = mapping.entries().collect();
    log::debug!(
        "{}: {} of {} voxels mapped to the sphere",
        hemisphere,
        mapping.valid_count(),
        mapping.len()
    );

    let evaluator: SurfaceFieldEvaluator<I> = SurfaceFieldEvaluator::new(&sphere, mode);
    evaluator.evaluate(&canonical_field, &queries)
}
