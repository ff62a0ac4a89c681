use nalgebra::DMatrix;

use crate::config::{AssetConfig, HemispherePaths};
use crate::error::Result;
use crate::interpolation::InterpolationMode;
use crate::mapping::{HemisphereMappings, MappingTable};
use crate::mesh::Resolution;
use crate::provider::{MappingProvider, MeshProvider, VolumeProvider};
use crate::surface_to_volume::{self, SurfaceToVolumeProjection};
use crate::volume::{CorticalMask, Volume};
use crate::volume_to_surface::{self, VolumeToSurfaceProjection};

/// Runs projections with the mapping tables and cortical mask named by an
/// `AssetConfig`, loaded through `provider`.
///
/// Nothing is cached between calls; every projection loads its assets again.
pub struct Resampler<P> {
    config: AssetConfig,
    provider: P,
}

impl<P> Resampler<P>
where
    P: MeshProvider + VolumeProvider + MappingProvider,
{
    pub fn new(config: AssetConfig, provider: P) -> Self {
        Resampler { config, provider }
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Projects surface fields of both hemispheres into the template volume.
    ///
    /// `mode` is `"nearest"` or `"linear"`; the configured default is used
    /// only when it is `None`.
    pub fn surface_to_volume(
        &self,
        lh_field: &DMatrix<f32>,
        rh_field: &DMatrix<f32>,
        mode: Option<&str>,
    ) -> Result<SurfaceToVolumeProjection> {
        let mode = self.interpolation_mode(mode)?;

        let mask_path = self.config.resolve(&self.config.cortical_mask);
        log::debug!("Loading cortical mask from {}", mask_path.display());
        let cortical_mask = CorticalMask::from_volume(&self.provider.load_volume(&mask_path)?);
        let mapping = self.load_mappings(&self.config.surface_to_volume_mappings)?;

        surface_to_volume::project_surface_to_volume(
            lh_field,
            rh_field,
            mode,
            &mapping,
            &cortical_mask,
            &self.provider,
        )
    }

    /// Samples `volume` at the vertices of both hemispheres of
    /// `target_resolution`.
    pub fn volume_to_surface(
        &self,
        volume: &Volume,
        mode: Option<&str>,
        target_resolution: Resolution,
    ) -> Result<VolumeToSurfaceProjection> {
        let mode = self.interpolation_mode(mode)?;
        let mapping = self.load_mappings(&self.config.volume_to_surface_mappings)?;

        volume_to_surface::project_volume_to_surface(
            volume,
            mode,
            &mapping.left,
            &mapping.right,
            target_resolution,
        )
    }

    fn interpolation_mode(&self, mode: Option<&str>) -> Result<InterpolationMode> {
        match mode {
            Some(mode) => mode.parse(),
            None => Ok(self.config.default_interpolation),
        }
    }

    fn load_mappings(&self, paths: &HemispherePaths) -> Result<HemisphereMappings> {
        let left_path = self.config.resolve(&paths.left);
        let right_path = self.config.resolve(&paths.right);
        log::debug!(
            "Loading mappings from {} and {}",
            left_path.display(),
            right_path.display()
        );

        Ok(HemisphereMappings {
            left: MappingTable::from_coordinates(self.provider.load_mapping(&left_path)?),
            right: MappingTable::from_coordinates(self.provider.load_mapping(&right_path)?),
        })
    }
}
