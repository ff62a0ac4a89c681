//! Sampling of volumetric fields at the vertices of both hemispheres.

use nalgebra::{DMatrix, Point3};

use crate::error::Result;
use crate::interpolation::{self, InterpolationMode};
use crate::mapping::MappingTable;
use crate::mesh::{Hemisphere, Resolution};
use crate::transform::VoxelTransform;
use crate::volume::Volume;

/// Per hemisphere surface fields, one row per volume frame and one column per
/// vertex.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VolumeToSurfaceProjection {
    pub left: DMatrix<f32>,
    pub right: DMatrix<f32>,
}

/// Samples every frame of `volume` at the vertices of both hemispheres of
/// `target_resolution`.
///
/// The mappings hold the physical coordinate of each vertex and may be longer
/// than the vertex count of the target resolution, in which case only the
/// leading entries are used. Coordinates are taken as they are; a coordinate
/// at the physical origin is a valid location here. Coordinates falling
/// outside of the volume's grid evaluate to zero.
pub fn project_volume_to_surface(
    volume: &Volume,
    mode: InterpolationMode,
    lh_mapping: &MappingTable,
    rh_mapping: &MappingTable,
    target_resolution: Resolution,
) -> Result<VolumeToSurfaceProjection> {
    let vertex_count = target_resolution.vertex_count();
    let lh_coordinates = lh_mapping.leading(vertex_count)?;
    let rh_coordinates = rh_mapping.leading(vertex_count)?;
    let transform = volume.transform()?;

    log::info!(
        "Sampling {} frame(s) at {} vertices per hemisphere in {} mode",
        volume.frame_count(),
        vertex_count,
        mode
    );

    Ok(VolumeToSurfaceProjection {
        left: sample_hemisphere(Hemisphere::Left, volume, &transform, mode, lh_coordinates),
        right: sample_hemisphere(Hemisphere::Right, volume, &transform, mode, rh_coordinates),
    })
}

fn sample_hemisphere(
    hemisphere: Hemisphere,
    volume: &Volume,
    transform: &VoxelTransform,
    mode: InterpolationMode,
    coordinates: &[Point3<f32>],
) -> DMatrix<f32> {
    let storage_indices: Vec<Point3<f64>> = coordinates
        .iter()
        .map(|coordinate| transform.physical_to_storage_index(coordinate))
        .collect();

    let interpolator = interpolation::grid_interpolator(mode);
    let mut values = Vec::with_capacity(volume.frame_count() * coordinates.len());
    for frame in volume.frames() {
        values.extend(interpolator.sample_batch(frame, &storage_indices));
    }
    log::debug!("{}: sampled {} values", hemisphere, values.len());

    DMatrix::from_row_slice(volume.frame_count(), coordinates.len(), &values)
}
