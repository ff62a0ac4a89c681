use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, ResampleError>;

/// Everything that can go wrong while resampling between surface and volume
/// representations, or while loading the assets the resampling needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// A surface field did not arrive as a single row of values.
    InvalidShape { rows: usize, columns: usize },
    /// The vertex count matches none of the canonical mesh resolutions.
    InvalidResolution(usize),
    InvalidInterpolationMode(String),
    /// A mapping table holds fewer coordinates than the target needs.
    InsufficientMapping { required: usize, available: usize },
    /// Two inputs that must describe the same number of elements don't.
    GridMismatch { expected: usize, actual: usize },
    /// A volume was built from an empty list of frames.
    NoFrames,
    /// The voxel-to-physical affine has no inverse.
    SingularTransform,
    AssetNotFound(String),
    PermissionDenied,
    ConfigSerialization(String),
    ConfigDeserialization(String),
    UnexpectedIo,
}

impl error::Error for ResampleError {}

impl fmt::Display for ResampleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResampleError::InvalidShape { rows, columns } => write!(
                f,
                "Expected a single row of values, got a {}x{} field.",
                rows, columns
            ),
            ResampleError::InvalidResolution(vertex_count) => write!(
                f,
                "Vertex count {} matches no supported mesh resolution.",
                vertex_count
            ),
            ResampleError::InvalidInterpolationMode(mode) => write!(
                f,
                "Unsupported interpolation mode '{}', expected 'nearest' or 'linear'.",
                mode
            ),
            ResampleError::InsufficientMapping {
                required,
                available,
            } => write!(
                f,
                "Mapping supplies {} coordinates, but {} are required.",
                available, required
            ),
            ResampleError::GridMismatch { expected, actual } => write!(
                f,
                "Expected {} elements, got {}.",
                expected, actual
            ),
            ResampleError::NoFrames => write!(f, "A volume needs at least one frame."),
            ResampleError::SingularTransform => {
                write!(f, "The voxel-to-physical transform is not invertible.")
            }
            ResampleError::AssetNotFound(asset) => write!(f, "Asset '{}' was not found.", asset),
            ResampleError::PermissionDenied => {
                write!(f, "Permission denied while accessing the file.")
            }
            ResampleError::ConfigSerialization(err) => write!(
                f,
                "An error occurred while serializing configuration: {}",
                err
            ),
            ResampleError::ConfigDeserialization(err) => write!(
                f,
                "An error occurred while deserializing configuration: {}",
                err
            ),
            ResampleError::UnexpectedIo => write!(f, "An unexpected I/O error occurred."),
        }
    }
}

impl From<io::Error> for ResampleError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ResampleError::AssetNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => ResampleError::PermissionDenied,
            _ => ResampleError::UnexpectedIo,
        }
    }
}
