//! Resampling of scalar fields between spherical cortical surface meshes and
//! voxel grids through precomputed coordinate mapping tables.

pub mod config;
pub mod convert;
pub mod error;
pub mod interpolation;
pub mod logger;
pub mod mapping;
pub mod mesh;
pub mod provider;
pub mod resampler;
pub mod resolution;
pub mod spatial_index;
pub mod surface_to_volume;
pub mod transform;
pub mod volume;
pub mod volume_to_surface;

pub use crate::config::{AssetConfig, HemispherePaths};
pub use crate::error::{ResampleError, Result};
pub use crate::interpolation::InterpolationMode;
pub use crate::mapping::{HemisphereMappings, MappingTable};
pub use crate::mesh::{GeometryVariant, Hemisphere, Resolution, SurfaceMesh};
pub use crate::provider::{GeneratedSphereMeshes, InMemoryAssets};
pub use crate::provider::{MappingProvider, MeshProvider, VolumeProvider};
pub use crate::resampler::Resampler;
pub use crate::surface_to_volume::{
    project_surface_to_volume, MaskMismatch, SurfaceToVolumeProjection,
    RIGHT_HEMISPHERE_LABEL_OFFSET,
};
pub use crate::transform::VoxelTransform;
pub use crate::volume::{CorticalMask, Volume, VoxelGrid};
pub use crate::volume_to_surface::{project_volume_to_surface, VolumeToSurfaceProjection};
