use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Orientation axis {axis} is not a unit vector (length {length})")]
    NonUnitAxis { axis: usize, length: f32 },

    #[error("Orientation axes {first} and {second} are not orthogonal")]
    NonOrthogonalAxes { first: usize, second: usize },

    #[error("Orientation axes {first} and {second} both normalize onto world axis {world}")]
    DegenerateOrientation {
        first: usize,
        second: usize,
        world: usize,
    },

    #[error("Voxel size must be positive and finite, got {0:?}")]
    InvalidVoxelSize([f32; 3]),

    #[error("Volume data has extent {actual:?} but geometry expects {expected:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        actual: [usize; 4],
    },

    #[error("Unknown plane orientation '{0}'")]
    UnknownPlane(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid viewer options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Buffer alignment must be non-zero")]
    ZeroAlignment,

    #[error("Zoom must be positive and finite, got {0}")]
    InvalidZoom(f32),

    #[error("Crosshair gap must be non-negative, got {0}")]
    InvalidCrosshairGap(f32),
}
