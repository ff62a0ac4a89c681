use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{ResampleError, Result};
use crate::interpolation::InterpolationMode;
use crate::mesh::Hemisphere;

pub const DEFAULT_TEMPLATE: &str = "MNI152";

const ASSET_DIRECTORY_NAME: &str = "cortex_resampler";

/// A pair of per-hemisphere asset paths.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HemispherePaths {
    pub left: PathBuf,
    pub right: PathBuf,
}

impl HemispherePaths {
    pub fn get(&self, hemisphere: Hemisphere) -> &Path {
        match hemisphere {
            Hemisphere::Left => &self.left,
            Hemisphere::Right => &self.right,
        }
    }
}

/// Where the default mapping tables and the cortical mask live.
///
/// Relative paths are resolved against `asset_root`, absolute paths are used
/// as they are.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetConfig {
    pub asset_root: PathBuf,
    /// Name of the volume template the mappings and the mask were computed
    /// for.
    pub template: String,
    /// Per voxel sphere coordinates, used by surface to volume projection.
    pub surface_to_volume_mappings: HemispherePaths,
    /// Per vertex physical coordinates, used by volume to surface projection.
    pub volume_to_surface_mappings: HemispherePaths,
    pub cortical_mask: PathBuf,
    /// Used when no interpolation mode is requested explicitly.
    pub default_interpolation: InterpolationMode,
}

impl AssetConfig {
    /// The default asset layout of `DEFAULT_TEMPLATE` under `asset_root`.
    pub fn with_asset_root<P: Into<PathBuf>>(asset_root: P) -> Self {
        let template = Path::new(DEFAULT_TEMPLATE);
        let per_hemisphere = |suffix: &str| HemispherePaths {
            left: template.join(format!("{}.{}", Hemisphere::Left.prefix(), suffix)),
            right: template.join(format!("{}.{}", Hemisphere::Right.prefix(), suffix)),
        };

        AssetConfig {
            asset_root: asset_root.into(),
            template: DEFAULT_TEMPLATE.to_string(),
            surface_to_volume_mappings: per_hemisphere("voxel_sphere_coordinates"),
            volume_to_surface_mappings: per_hemisphere("vertex_physical_coordinates"),
            cortical_mask: template.join("cortex_mask.nii.gz"),
            default_interpolation: InterpolationMode::Nearest,
        }
    }

    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.asset_root.join(path)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig::with_asset_root(default_asset_root())
    }
}

/// Asset directory inside the user's data directory, or the working
/// directory if the platform doesn't define one.
pub fn default_asset_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(ASSET_DIRECTORY_NAME)
}

pub fn save<P: AsRef<Path>>(path: P, config: &AssetConfig) -> Result<()> {
    let pretty_config = ron::ser::PrettyConfig::new();
    let contents = ron::ser::to_string_pretty(config, pretty_config)
        .map_err(|err| ResampleError::ConfigSerialization(err.to_string()))?;
    let mut file = File::create(path)?;

    file.write_all(contents.as_bytes())?;

    Ok(())
}

pub fn open<P: AsRef<Path>>(path: P) -> Result<AssetConfig> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let config = ron::de::from_reader(buf_reader)
        .map_err(|err| ResampleError::ConfigDeserialization(err.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("cortex_resampler_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_config_save_and_open_round_trip() {
        let path = temp_path("round_trip.ron");
        let mut config = AssetConfig::with_asset_root("/srv/assets");
        config.default_interpolation = InterpolationMode::Linear;

        save(&path, &config).unwrap();
        let opened = open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(opened, config);
    }

    #[test]
    fn test_config_open_missing_file() {
        let result = open(temp_path("does_not_exist.ron"));

        assert!(matches!(result, Err(ResampleError::AssetNotFound(_))));
    }

    #[test]
    fn test_config_open_malformed_file() {
        let path = temp_path("malformed.ron");
        fs::write(&path, "AssetConfig(asset_root: 42").unwrap();

        let result = open(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ResampleError::ConfigDeserialization(_))));
    }

    #[test]
    fn test_config_default_layout_resolves_under_root() {
        let config = AssetConfig::with_asset_root("/srv/assets");

        assert_eq!(
            config.resolve(config.surface_to_volume_mappings.get(Hemisphere::Right)),
            Path::new("/srv/assets/MNI152/rh.voxel_sphere_coordinates")
        );
        assert_eq!(
            config.resolve(&config.cortical_mask),
            Path::new("/srv/assets/MNI152/cortex_mask.nii.gz")
        );
        assert_eq!(
            config.resolve("/elsewhere/mask.nii.gz"),
            Path::new("/elsewhere/mask.nii.gz")
        );
    }

    #[test]
    fn test_config_default_asset_root_ends_with_crate_directory() {
        assert!(default_asset_root().ends_with(ASSET_DIRECTORY_NAME));
    }
}
