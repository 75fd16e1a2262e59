use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::enums::PlaneOrientation;
use crate::error::ConfigError;
use crate::slice::DEFAULT_ALIGNMENT;
use crate::window::DEFAULT_CROSSHAIR_GAP;

/// Viewer defaults, usually read from a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub plane: PlaneOrientation,
    pub zoom: f32,
    /// Keep the crosshair in view while zoomed.
    pub recenter: bool,
    pub buffer_alignment: usize,
    pub crosshair_gap: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            plane: PlaneOrientation::Axial,
            zoom: 1.0,
            recenter: false,
            buffer_alignment: DEFAULT_ALIGNMENT,
            crosshair_gap: DEFAULT_CROSSHAIR_GAP,
        }
    }
}

impl ViewerOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_alignment == 0 {
            return Err(ConfigError::ZeroAlignment);
        }
        if !(self.zoom > 0.0 && self.zoom.is_finite()) {
            return Err(ConfigError::InvalidZoom(self.zoom));
        }
        if !(self.crosshair_gap >= 0.0) {
            return Err(ConfigError::InvalidCrosshairGap(self.crosshair_gap));
        }
        Ok(())
    }
}
