use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Anatomical plane a widget looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneOrientation {
    #[default]
    Axial,
    Sagittal,
    Coronal,
    NotSpecified,
}

impl PlaneOrientation {
    pub const ANATOMICAL: [PlaneOrientation; 3] = [
        PlaneOrientation::Axial,
        PlaneOrientation::Sagittal,
        PlaneOrientation::Coronal,
    ];
}

impl fmt::Display for PlaneOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaneOrientation::Axial => "axial",
            PlaneOrientation::Sagittal => "sagittal",
            PlaneOrientation::Coronal => "coronal",
            PlaneOrientation::NotSpecified => "not_specified",
        };
        f.write_str(name)
    }
}

impl FromStr for PlaneOrientation {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "axial" => Ok(PlaneOrientation::Axial),
            "sagittal" => Ok(PlaneOrientation::Sagittal),
            "coronal" => Ok(PlaneOrientation::Coronal),
            "not_specified" | "none" => Ok(PlaneOrientation::NotSpecified),
            _ => Err(GeometryError::UnknownPlane(s.to_string())),
        }
    }
}

/// How a slice was read out of its volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Axis permutation only, voxels copied verbatim.
    Aligned,
    /// Nearest-neighbour point sampling on a physical grid.
    Oblique,
}
