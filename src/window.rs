//! Conversion between surface pixels and voxels.
//!
//! `window_to_voxel` floors and `voxel_to_window` rounds to the pixel
//! center, so a round trip may land one voxel off at pixel boundaries.

use glam::{IVec2, IVec4, Vec2};

use crate::orientation::PlaneMapping;
use crate::viewport::{DrawSurface, ViewPort};

/// Gap between the crosshair center and its arms, in surface pixels.
pub const DEFAULT_CROSSHAIR_GAP: f32 = 15.0;

/// Native voxel under a surface pixel.
///
/// `slice` is the depth in plane display indices. The time component of
/// the result is zero. Returns `None` for a viewport that renders nothing.
pub fn window_to_voxel(
    pixel: Vec2,
    slice: i32,
    viewport: &ViewPort,
    mapping: &PlaneMapping,
) -> Option<IVec4> {
    if !viewport.is_renderable() {
        return None;
    }

    let voxel_x = ((pixel.x - viewport.offset_x) / viewport.scale_x).floor() as i32;
    let voxel_y = ((pixel.y - viewport.offset_y) / viewport.scale_y).floor() as i32;

    Some(mapping.to_native(IVec4::new(voxel_x, voxel_y, slice, 0)))
}

/// Surface pixel at the center of a native voxel's footprint.
pub fn voxel_to_window(voxel: IVec4, viewport: &ViewPort, mapping: &PlaneMapping) -> Option<IVec2> {
    if !viewport.is_renderable() {
        return None;
    }

    let plane = mapping.to_plane(voxel);
    let x = plane.x as f32 * viewport.scale_x + viewport.offset_x + viewport.scale_x / 2.0;
    let y = plane.y as f32 * viewport.scale_y + viewport.offset_y + viewport.scale_y / 2.0;

    Some(IVec2::new(x.round() as i32, y.round() as i32))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crosshair {
    pub center: Vec2,
    pub gap: f32,
}

impl Crosshair {
    pub fn new(center: Vec2, gap: f32) -> Self {
        Self { center, gap }
    }

    /// Crosshair over a native voxel, `None` when nothing is rendered.
    pub fn at_voxel(
        voxel: IVec4,
        viewport: &ViewPort,
        mapping: &PlaneMapping,
        gap: f32,
    ) -> Option<Self> {
        voxel_to_window(voxel, viewport, mapping).map(|center| Self::new(center.as_vec2(), gap))
    }

    /// Arms from each surface edge to the gap: top, bottom, left, right.
    pub fn segments(&self, surface: DrawSurface) -> [Segment; 4] {
        let Vec2 { x, y } = self.center;
        let (width, height) = (surface.width as f32, surface.height as f32);

        [
            Segment::new(Vec2::new(x, 0.0), Vec2::new(x, y - self.gap)),
            Segment::new(Vec2::new(x, y + self.gap), Vec2::new(x, height)),
            Segment::new(Vec2::new(0.0, y), Vec2::new(x - self.gap, y)),
            Segment::new(Vec2::new(x + self.gap, y), Vec2::new(width, y)),
        ]
    }
}
