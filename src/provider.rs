//! Seams to the collaborators that read assets from storage.
//!
//! File formats of meshes, volumes and mapping tables are not handled by this
//! crate. Callers implement these traits over their readers, or load the data
//! themselves and hand it over through `InMemoryAssets`.

use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use nalgebra::Point3;

use crate::error::{ResampleError, Result};
use crate::mesh::{primitive, GeometryVariant, Hemisphere, Resolution, SurfaceMesh};
use crate::volume::Volume;

#[cfg_attr(test, mockall::automock)]
pub trait MeshProvider {
    fn load_mesh(
        &self,
        hemisphere: Hemisphere,
        resolution: Resolution,
        variant: GeometryVariant,
    ) -> Result<SurfaceMesh>;
}

pub trait VolumeProvider {
    fn load_volume(&self, path: &Path) -> Result<Volume>;
}

pub trait MappingProvider {
    fn load_mapping(&self, path: &Path) -> Result<Vec<Point3<f32>>>;
}

/// Assets kept in memory, keyed the same way the provider traits ask for
/// them.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssets {
    meshes: FxHashMap<(Hemisphere, Resolution, GeometryVariant), SurfaceMesh>,
    volumes: FxHashMap<PathBuf, Volume>,
    mappings: FxHashMap<PathBuf, Vec<Point3<f32>>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mesh(
        &mut self,
        hemisphere: Hemisphere,
        resolution: Resolution,
        variant: GeometryVariant,
        mesh: SurfaceMesh,
    ) {
        self.meshes.insert((hemisphere, resolution, variant), mesh);
    }

    pub fn insert_volume<P: Into<PathBuf>>(&mut self, path: P, volume: Volume) {
        self.volumes.insert(path.into(), volume);
    }

    pub fn insert_mapping<P: Into<PathBuf>>(&mut self, path: P, coordinates: Vec<Point3<f32>>) {
        self.mappings.insert(path.into(), coordinates);
    }
}

impl MeshProvider for InMemoryAssets {
    fn load_mesh(
        &self,
        hemisphere: Hemisphere,
        resolution: Resolution,
        variant: GeometryVariant,
    ) -> Result<SurfaceMesh> {
        self.meshes
            .get(&(hemisphere, resolution, variant))
            .cloned()
            .ok_or_else(|| {
                ResampleError::AssetNotFound(format!(
                    "{}.{}.{}",
                    hemisphere,
                    variant.name(),
                    resolution.tag()
                ))
            })
    }
}

impl VolumeProvider for InMemoryAssets {
    fn load_volume(&self, path: &Path) -> Result<Volume> {
        self.volumes
            .get(path)
            .cloned()
            .ok_or_else(|| ResampleError::AssetNotFound(path.display().to_string()))
    }
}

impl MappingProvider for InMemoryAssets {
    fn load_mapping(&self, path: &Path) -> Result<Vec<Point3<f32>>> {
        self.mappings
            .get(path)
            .cloned()
            .ok_or_else(|| ResampleError::AssetNotFound(path.display().to_string()))
    }
}

/// Generates sphere meshes of the canonical subdivision scheme instead of
/// loading them. Only provides the `Sphere` variant; both hemispheres share
/// the same sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedSphereMeshes {
    radius: f32,
}

impl GeneratedSphereMeshes {
    pub fn new(radius: f32) -> Self {
        GeneratedSphereMeshes { radius }
    }
}

impl MeshProvider for GeneratedSphereMeshes {
    fn load_mesh(
        &self,
        hemisphere: Hemisphere,
        resolution: Resolution,
        variant: GeometryVariant,
    ) -> Result<SurfaceMesh> {
        match variant {
            GeometryVariant::Sphere => {
                log::debug!("Generating {} sphere at {}", hemisphere, resolution);
                Ok(primitive::create_canonical_sphere(resolution, self.radius))
            }
            other => Err(ResampleError::AssetNotFound(format!(
                "{}.{}.{}",
                hemisphere,
                other.name(),
                resolution.tag()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Matrix4, Vector3};

    use crate::volume::VoxelGrid;

    use super::*;

    #[test]
    fn test_in_memory_assets_returns_inserted_mesh() {
        let mesh = primitive::create_icosphere([0.0, 0.0, 0.0], 1.0, 0);
        let mut assets = InMemoryAssets::new();
        assets.insert_mesh(
            Hemisphere::Left,
            Resolution::Low,
            GeometryVariant::Sphere,
            mesh.clone(),
        );

        let loaded = assets
            .load_mesh(Hemisphere::Left, Resolution::Low, GeometryVariant::Sphere)
            .unwrap();

        assert_eq!(loaded, mesh);
    }

    #[test]
    fn test_in_memory_assets_missing_mesh() {
        let assets = InMemoryAssets::new();

        let error = assets
            .load_mesh(Hemisphere::Right, Resolution::Canonical, GeometryVariant::Pial)
            .unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"Asset 'rh.pial.164k' was not found.");
    }

    #[test]
    fn test_in_memory_assets_volume_and_mapping_by_path() {
        let mut assets = InMemoryAssets::new();
        let volume = Volume::from_grid(
            VoxelGrid::filled(&Vector3::new(1, 1, 1), 2.0),
            Matrix4::identity(),
        );
        assets.insert_volume("mask.nii.gz", volume.clone());
        assets.insert_mapping("lh.map", vec![Point3::new(1.0, 2.0, 3.0)]);

        assert_eq!(assets.load_volume(Path::new("mask.nii.gz")).unwrap(), volume);
        assert_eq!(
            assets.load_mapping(Path::new("lh.map")).unwrap(),
            vec![Point3::new(1.0, 2.0, 3.0)]
        );
        assert!(assets.load_mapping(Path::new("rh.map")).is_err());
    }

    #[test]
    fn test_generated_sphere_meshes_only_provide_spheres() {
        let provider = GeneratedSphereMeshes::new(100.0);

        let sphere = provider
            .load_mesh(Hemisphere::Left, Resolution::Low, GeometryVariant::Sphere)
            .unwrap();

        assert_eq!(sphere.vertex_count(), 10242);
        assert!(provider
            .load_mesh(Hemisphere::Left, Resolution::Low, GeometryVariant::White)
            .is_err());
    }
}
