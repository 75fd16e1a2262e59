//! Placement of a mapped plane inside a draw surface.
//!
//! Letterboxing keeps the aspect ratio of the plane in voxels. Zoom shifts
//! the origin by the physical plane size and leaves the scale alone.

use glam::{Affine2, IVec2, IVec4, Mat2, Vec2, Vec4};
use tracing::trace;

use crate::enums::PlaneOrientation;
use crate::geometry::{ImageGeometry, PlaneRect};
use crate::orientation::{PlaneMapping, map_voxel_to_orientation};

/// Zoom term of the recenter pan. Calibration constant.
pub const RECENTER_ZOOM_COEFFICIENT: f32 = 2.0;

/// Extra pan applied when recentering. Calibration constant.
pub const RECENTER_MARGIN: f32 = 0.10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawSurface {
    pub width: u32,
    pub height: u32,
}

impl DrawSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Interaction state a widget owns and hands to each geometry call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub zoom: f32,
    /// Crosshair position in native voxel indices, may lie outside the image.
    pub voxel_coords: IVec4,
    /// Crosshair position in millimetres.
    pub physical_coords: Vec4,
    /// Pan so the crosshair stays visible while zoomed.
    pub recenter: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            voxel_coords: IVec4::ZERO,
            physical_coords: Vec4::ZERO,
            recenter: false,
        }
    }
}

impl ViewState {
    pub fn at_voxel(geometry: &ImageGeometry, voxel: IVec4) -> Self {
        Self {
            voxel_coords: voxel,
            physical_coords: geometry.index_to_physical(voxel),
            ..Self::default()
        }
    }

    pub fn at_physical(geometry: &ImageGeometry, physical: Vec4) -> Self {
        Self {
            voxel_coords: geometry.physical_to_index(physical),
            physical_coords: physical,
            ..Self::default()
        }
    }

    pub fn with_zoom(self, zoom: f32) -> Self {
        Self { zoom, ..self }
    }

    pub fn with_recenter(self, recenter: bool) -> Self {
        Self { recenter, ..self }
    }

    /// Move the crosshair, keeping zoom and recenter.
    pub fn move_to_voxel(&mut self, geometry: &ImageGeometry, voxel: IVec4) {
        self.voxel_coords = voxel;
        self.physical_coords = geometry.index_to_physical(voxel);
    }
}

/// Placement of a plane inside a draw surface, in surface pixels.
///
/// A zero scale means there is nothing to render.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewPort {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub pixel_width: f32,
    pub pixel_height: f32,
}

impl ViewPort {
    pub fn is_renderable(&self) -> bool {
        self.scale_x > 0.0 && self.scale_y > 0.0
    }
}

/// Fit a plane of `plane_size` voxels into `surface`.
///
/// `physical_size` is the plane extent in millimetres and only feeds the zoom
/// shift. With `recenter` set the plane pans by `size / 2 - recenter` voxels.
pub fn compute_viewport(
    plane_size: [usize; 2],
    physical_size: Vec2,
    surface: DrawSurface,
    zoom: f32,
    recenter: Option<IVec2>,
) -> ViewPort {
    if plane_size.contains(&0) || surface.is_empty() || !(zoom > 0.0 && zoom.is_finite()) {
        trace!(?plane_size, ?surface, zoom, "Nothing to render");
        return ViewPort::default();
    }

    let (width, height) = (surface.width as f32, surface.height as f32);
    let (size_w, size_h) = (plane_size[0] as f32, plane_size[1] as f32);

    let scale_w = width / size_w;
    let scale_h = height / size_h;
    let norm_h = if scale_w < scale_h { scale_w / scale_h } else { 1.0 };
    let norm_w = if scale_w > scale_h { scale_h / scale_w } else { 1.0 };
    let scale_x = scale_w * norm_w;
    let scale_y = scale_h * norm_h;

    let mut offset_x = (width - scale_x * size_w) / 2.0;
    let mut offset_y = (height - scale_y * size_h) / 2.0;
    offset_x += physical_size.x - zoom * physical_size.x;
    offset_y += physical_size.y - zoom * physical_size.y;

    if let Some(voxel) = recenter {
        let center = IVec2::new(plane_size[0] as i32 / 2, plane_size[1] as i32 / 2);
        let diff = (center - voxel).as_vec2();
        let shift = 1.0 - RECENTER_ZOOM_COEFFICIENT / zoom;
        offset_x += diff.x + shift * diff.x + RECENTER_MARGIN * diff.x;
        offset_y += diff.y + shift * diff.y + RECENTER_MARGIN * diff.y;
    }

    ViewPort {
        offset_x,
        offset_y,
        scale_x,
        scale_y,
        pixel_width: (size_w * scale_x).round(),
        pixel_height: (size_h * scale_y).round(),
    }
}

/// Viewport of `geometry` in `plane` for the current view state.
pub fn layout_viewport(
    geometry: &ImageGeometry,
    plane: PlaneOrientation,
    surface: DrawSurface,
    state: &ViewState,
) -> ViewPort {
    let mapping = geometry.mapping(plane);
    let [width, height, _] = mapping.plane_size();
    let physical = mapping.physical_size(geometry.voxel_size());
    // pan is taken in the signed plane domain, halving a flipped size truncates toward zero
    let recenter = state.recenter.then(|| {
        let mapped = map_voxel_to_orientation(
            state.voxel_coords,
            mapping.orientation(),
            plane,
            false,
            false,
        );
        let diff = mapping.mapped_size() / 2 - mapped;
        IVec2::new(width as i32 / 2 - diff.x, height as i32 / 2 - diff.y)
    });

    compute_viewport(
        [width, height],
        Vec2::new(physical.x, physical.y),
        surface,
        state.zoom,
        recenter,
    )
}

/// Affine from slice-buffer coordinates to surface pixels.
///
/// Flipped plane axes are mirrored about the plane size before scaling, so a
/// buffer filled in native voxel order shows up in display order.
pub fn draw_transform(viewport: &ViewPort, mapping: &PlaneMapping) -> Affine2 {
    let [width, height, _] = mapping.plane_size();
    let axis = |flipped: bool, scale: f32, offset: f32, size: usize| {
        if flipped {
            (-scale, offset + size as f32 * scale)
        } else {
            (scale, offset)
        }
    };

    let (m11, dx) = axis(mapping.is_flipped(0), viewport.scale_x, viewport.offset_x, width);
    let (m22, dy) = axis(mapping.is_flipped(1), viewport.scale_y, viewport.offset_y, height);

    Affine2::from_mat2_translation(Mat2::from_diagonal(Vec2::new(m11, m22)), Vec2::new(dx, dy))
}

/// Letterbox a plane-space rectangle into `surface`, uniform scale, centered.
pub fn fit_rect(rect: &PlaneRect, surface: DrawSurface) -> PlaneRect {
    if !(rect.width > 0.0 && rect.height > 0.0) || surface.is_empty() {
        return PlaneRect::default();
    }

    let (width, height) = (surface.width as f32, surface.height as f32);
    let scale = (width / rect.width).min(height / rect.height);
    let fitted_w = rect.width * scale;
    let fitted_h = rect.height * scale;

    PlaneRect {
        x: (width - fitted_w) / 2.0,
        y: (height - fitted_h) / 2.0,
        width: fitted_w,
        height: fitted_h,
    }
}
