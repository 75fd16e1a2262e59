//! # vast-view
//!
//! Orientation and viewport geometry for radiological image viewers.
//!
//! This crate holds the toolkit-independent core of a multi-planar viewer:
//! everything between an image's voxel grid and the pixels of a draw
//! surface. Medical volumes come in arbitrary orientations, yet a viewer
//! shows them in three fixed radiological planes:
//!  - Axial
//!  - Sagittal
//!  - Coronal
//!
//!  The crate maps coordinates between an image's native axes and those
//!  planes, copies plane slices out of a volume, fits a plane into a draw
//!  surface with zoom and pan, and converts between surface pixels and
//!  voxels for crosshair placement and click-to-navigate. Getting axis signs
//!  wrong here shows up as left/right flipped images, so every mapping is a
//!  signed axis permutation with an exact inverse.
//!
//!  Images whose orientation still matches the one latched when they were
//!  first shown are sliced by axis permutation. Images rotated afterwards,
//!  e.g. by a registration, are resampled on a physical grid with
//!  nearest-neighbour lookup.
//!
//! # Examples
//!
//! ## Extracting an axial slice and placing it on screen
//!
//! ```
//! # use vast_view::{DrawSurface, ImageGeometry, PlaneOrientation, SliceBuffer, ViewState, Volume};
//! # use vast_view::{extract_slice, layout_viewport, voxel_to_window, DEFAULT_ALIGNMENT};
//! # use glam::IVec4;
//! # use ndarray::Array3;
//! let geometry = ImageGeometry::axis_aligned([64, 64, 32, 1], [1.0, 1.0, 2.0])
//!     .expect("should have accepted an identity orientation");
//! let volume = Volume::from_frame(Array3::<u16>::zeros((32, 64, 64)), geometry)
//!     .expect("should have matched the geometry extent");
//!
//! let state = ViewState::at_voxel(volume.geometry(), IVec4::new(32, 32, 16, 0));
//! let mapping = volume.geometry().mapping(PlaneOrientation::Axial);
//! let mut slice = SliceBuffer::for_plane(&mapping, DEFAULT_ALIGNMENT);
//! extract_slice(&volume, PlaneOrientation::Axial, &state, &mut slice);
//!
//! let surface = DrawSurface::new(512, 512);
//! let viewport = layout_viewport(volume.geometry(), PlaneOrientation::Axial, surface, &state);
//! let crosshair = voxel_to_window(state.voxel_coords, &viewport, &mapping);
//! assert!(crosshair.is_some());
//! ```

pub mod config;
pub mod enums;
pub mod error;
pub mod geometry;
pub mod orientation;
pub mod slice;
pub mod viewport;
pub mod volume;
pub mod window;

pub use config::ViewerOptions;
pub use enums::{ExtractionMode, PlaneOrientation};
pub use error::{ConfigError, GeometryError};
pub use geometry::{BoundingBox, ImageGeometry, PlaneRect};
pub use orientation::{
    PlaneMapping, is_normalized, map_coords_to_orientation, map_voxel_to_orientation,
    normalize_orientation,
};
pub use slice::{DEFAULT_ALIGNMENT, SliceBuffer, aligned_size, extract_slice};
pub use viewport::{
    DrawSurface, ViewPort, ViewState, compute_viewport, draw_transform, fit_rect, layout_viewport,
};
pub use volume::Volume;
pub use window::{Crosshair, Segment, window_to_voxel, voxel_to_window};
