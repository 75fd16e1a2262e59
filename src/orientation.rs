//! Mapping between an image's native voxel axes and a viewing plane.
//!
//! Every viewing plane is a fixed signed permutation of the world axes. An
//! image's normalized orientation is another signed permutation, from its
//! voxel axes to the world axes. Composing the two gives a matrix `M` that
//! takes a native coordinate to plane space (x, y, depth, time). Both factors
//! are orthogonal, so `transpose(M)` takes plane space back to native space.

use glam::{IVec4, Mat4, Vec3, Vec4};

use crate::enums::PlaneOrientation;
use crate::error::GeometryError;

/// Builds a plane transform from its rows. The time axis stays identity.
const fn plane_transform(rows: [[f32; 3]; 3]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(rows[0][0], rows[1][0], rows[2][0], 0.0),
        Vec4::new(rows[0][1], rows[1][1], rows[2][1], 0.0),
        Vec4::new(rows[0][2], rows[1][2], rows[2][2], 0.0),
        Vec4::W,
    )
}

/// Radiological axial view, patient left on screen right.
pub const AXIAL: Mat4 = plane_transform([
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
]);

/// Plane x follows world y, plane y runs against world z, depth is world x.
pub const SAGITTAL: Mat4 = plane_transform([
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
]);

/// Plane x runs against world x, plane y against world z, depth is world y.
pub const CORONAL: Mat4 = plane_transform([
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 1.0, 0.0],
]);

impl PlaneOrientation {
    /// World to plane transform of this plane.
    pub const fn transform(self) -> Mat4 {
        match self {
            PlaneOrientation::Axial => AXIAL,
            PlaneOrientation::Sagittal => SAGITTAL,
            PlaneOrientation::Coronal => CORONAL,
            PlaneOrientation::NotSpecified => Mat4::IDENTITY,
        }
    }

    /// World axis shown along each plane axis (x, y, depth).
    pub fn world_axes(self) -> [usize; 3] {
        let axes = map_voxel_to_orientation(IVec4::new(0, 1, 2, 3), &Mat4::IDENTITY, self, false, true);
        [axes.x as usize, axes.y as usize, axes.z as usize]
    }
}

/// Maps `coords` from native orientation into `plane` space, or back when
/// `back` is set.
///
/// The result is unit agnostic: voxel indices and millimetres go through the
/// same matrix. `absolute` drops the signs, which is what sizes and extents
/// need. The time component is never touched.
pub fn map_coords_to_orientation(
    coords: Vec4,
    orientation: &Mat4,
    plane: PlaneOrientation,
    back: bool,
    absolute: bool,
) -> Vec4 {
    let combined = plane.transform() * *orientation;
    let mapped = if back {
        combined.transpose() * coords
    } else {
        combined * coords
    };

    if absolute { mapped.abs() } else { mapped }
}

/// Integer variant of [`map_coords_to_orientation`]. Exact for normalized
/// orientations.
pub fn map_voxel_to_orientation(
    coords: IVec4,
    orientation: &Mat4,
    plane: PlaneOrientation,
    back: bool,
    absolute: bool,
) -> IVec4 {
    map_coords_to_orientation(coords.as_vec4(), orientation, plane, back, absolute)
        .round()
        .as_ivec4()
}

/// Rounds a direction-cosine matrix to the nearest signed permutation.
///
/// Each voxel axis snaps onto the world axis of its largest component. Fails
/// when two voxel axes snap onto the same world axis.
pub fn normalize_orientation(orientation: &Mat4) -> Result<Mat4, GeometryError> {
    let mut normalized = Mat4::IDENTITY;
    let mut claimed: [Option<usize>; 3] = [None; 3];

    for axis in 0..3 {
        let column = orientation.col(axis).truncate();
        let magnitude = column.abs();
        let world = if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
            0
        } else if magnitude.y >= magnitude.z {
            1
        } else {
            2
        };

        if let Some(first) = claimed[world] {
            return Err(GeometryError::DegenerateOrientation {
                first,
                second: axis,
                world,
            });
        }
        claimed[world] = Some(axis);

        let mut snapped = Vec4::ZERO;
        snapped[world] = column[world].signum();
        *normalized.col_mut(axis) = snapped;
    }

    Ok(normalized)
}

/// Whether every spatial row and column holds exactly one ±1 entry and the
/// time axis is identity.
pub fn is_normalized(matrix: &Mat4) -> bool {
    if matrix.col(3) != Vec4::W || matrix.row(3) != Vec4::W {
        return false;
    }
    (0..3).all(|i| {
        is_axis_selector(matrix.row(i).truncate()) && is_axis_selector(matrix.col(i).truncate())
    })
}

fn is_axis_selector(v: Vec3) -> bool {
    let nonzero = v.to_array().iter().filter(|c| **c != 0.0).count();
    nonzero == 1 && v.abs().max_element() == 1.0
}

/// Mapping of one image onto one viewing plane.
///
/// Plane indices returned by [`PlaneMapping::to_plane`] are display indices:
/// on a flipped axis index 0 is the last native voxel. Slice buffers are
/// filled in native order and mirrored by the draw transform instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneMapping {
    plane: PlaneOrientation,
    orientation: Mat4,
    mapped_size: IVec4,
    flips: Vec4,
    source_axes: [usize; 3],
}

impl PlaneMapping {
    /// `orientation` must be normalized.
    pub fn new(orientation: &Mat4, extent: [usize; 4], plane: PlaneOrientation) -> Self {
        let extent = IVec4::new(
            extent[0] as i32,
            extent[1] as i32,
            extent[2] as i32,
            extent[3] as i32,
        );
        let mapped_size = map_voxel_to_orientation(extent, orientation, plane, false, false);
        let flips = map_coords_to_orientation(Vec4::ONE, orientation, plane, false, false);
        let axes = map_voxel_to_orientation(IVec4::new(0, 1, 2, 3), orientation, plane, false, true);

        Self {
            plane,
            orientation: *orientation,
            mapped_size,
            flips,
            source_axes: [axes.x as usize, axes.y as usize, axes.z as usize],
        }
    }

    pub fn plane(&self) -> PlaneOrientation {
        self.plane
    }

    pub fn orientation(&self) -> &Mat4 {
        &self.orientation
    }

    /// Signed size in plane space. A negative entry marks a flipped axis.
    pub fn mapped_size(&self) -> IVec4 {
        self.mapped_size
    }

    /// Plane extent (width, height, depth).
    pub fn plane_size(&self) -> [usize; 3] {
        let size = self.mapped_size.abs();
        [size.x as usize, size.y as usize, size.z as usize]
    }

    /// Native axis displayed along `plane_axis`.
    pub fn source_axis(&self, plane_axis: usize) -> usize {
        self.source_axes[plane_axis]
    }

    pub fn is_flipped(&self, plane_axis: usize) -> bool {
        self.flips[plane_axis] < 0.0
    }

    /// Native voxel index to plane display index.
    pub fn to_plane(&self, voxel: IVec4) -> IVec4 {
        let mut mapped =
            map_voxel_to_orientation(voxel, &self.orientation, self.plane, false, false);
        for axis in 0..3 {
            if self.is_flipped(axis) {
                mapped[axis] += self.mapped_size[axis].abs() - 1;
            }
        }
        mapped
    }

    /// Plane display index back to native voxel index.
    pub fn to_native(&self, plane: IVec4) -> IVec4 {
        let mut signed = plane;
        for axis in 0..3 {
            if self.is_flipped(axis) {
                // the transpose negates flipped axes again
                signed[axis] = -(self.mapped_size[axis].abs() - plane[axis] - 1);
            }
        }
        map_voxel_to_orientation(signed, &self.orientation, self.plane, true, false)
    }

    /// Voxel size along the plane axes.
    pub fn voxel_size(&self, voxel_size: Vec4) -> Vec4 {
        map_coords_to_orientation(voxel_size, &self.orientation, self.plane, false, true)
    }

    /// Physical extent of the plane in millimetres.
    pub fn physical_size(&self, voxel_size: Vec4) -> Vec4 {
        self.voxel_size(voxel_size) * self.mapped_size.abs().as_vec4()
    }
}
