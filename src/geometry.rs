use glam::{IVec4, Mat3, Mat4, Vec3, Vec4};

use crate::enums::PlaneOrientation;
use crate::error::GeometryError;
use crate::orientation::{PlaneMapping, normalize_orientation};

const ORTHONORMAL_TOLERANCE: f32 = 1e-4;

/// Spatial description of a 3D+time image.
///
/// Indices are (x, y, z, t). The orientation holds the world direction of
/// each voxel axis in its columns. The latched orientation is the
/// normalized orientation captured when the image was first displayed;
/// slices are extracted by axis permutation only while the two agree.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageGeometry {
    extent: [usize; 4],
    voxel_size: Vec3,
    origin: Vec3,
    orientation: Mat4,
    latched_orientation: Mat4,
}

impl ImageGeometry {
    /// Create a geometry and latch its normalized orientation
    ///
    /// # Errors
    ///
    /// Returns error if the voxel size is not positive or the direction
    /// cosines are not orthonormal
    pub fn new(
        extent: [usize; 4],
        voxel_size: [f32; 3],
        origin: [f32; 3],
        directions: Mat3,
    ) -> Result<Self, GeometryError> {
        if voxel_size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(GeometryError::InvalidVoxelSize(voxel_size));
        }
        validate_directions(&directions)?;

        let orientation = Mat4::from_mat3(directions);
        let latched_orientation = normalize_orientation(&orientation)?;

        Ok(Self {
            extent,
            voxel_size: Vec3::from_array(voxel_size),
            origin: Vec3::from_array(origin),
            orientation,
            latched_orientation,
        })
    }

    /// Geometry with identity orientation and origin at zero.
    pub fn axis_aligned(extent: [usize; 4], voxel_size: [f32; 3]) -> Result<Self, GeometryError> {
        Self::new(extent, voxel_size, [0.0; 3], Mat3::IDENTITY)
    }

    /// Same image under new direction cosines, latched orientation kept.
    pub fn reoriented(&self, directions: Mat3) -> Result<Self, GeometryError> {
        validate_directions(&directions)?;
        Ok(Self {
            orientation: Mat4::from_mat3(directions),
            ..self.clone()
        })
    }

    /// Re-capture the latched orientation from the current one.
    pub fn latch(&mut self) -> Result<(), GeometryError> {
        self.latched_orientation = normalize_orientation(&self.orientation)?;
        Ok(())
    }

    pub fn is_aligned(&self) -> bool {
        self.orientation == self.latched_orientation
    }

    pub fn extent(&self) -> [usize; 4] {
        self.extent
    }

    /// Voxel size in millimetres, time step fixed at 1.
    pub fn voxel_size(&self) -> Vec4 {
        self.voxel_size.extend(1.0)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn orientation(&self) -> &Mat4 {
        &self.orientation
    }

    pub fn latched_orientation(&self) -> &Mat4 {
        &self.latched_orientation
    }

    pub fn mapping(&self, plane: PlaneOrientation) -> PlaneMapping {
        PlaneMapping::new(&self.latched_orientation, self.extent, plane)
    }

    pub fn index_to_physical(&self, index: IVec4) -> Vec4 {
        let scaled = index.truncate().as_vec3() * self.voxel_size;
        let world = self.origin + self.orientation.transform_vector3(scaled);
        world.extend(index.w as f32)
    }

    /// Nearest voxel to a physical point. The result may lie outside the
    /// image.
    pub fn physical_to_index(&self, physical: Vec4) -> IVec4 {
        let relative = physical.truncate() - self.origin;
        let local = self.orientation.transpose().transform_vector3(relative) / self.voxel_size;
        local.round().as_ivec3().extend(physical.w.round() as i32)
    }

    pub fn contains(&self, index: IVec4) -> bool {
        (0..4).all(|axis| index[axis] >= 0 && (index[axis] as usize) < self.extent[axis])
    }

    /// Clamp an index into the image extent.
    pub fn clamp(&self, index: IVec4) -> IVec4 {
        let mut clamped = index;
        for axis in 0..4 {
            let last = self.extent[axis].saturating_sub(1) as i32;
            clamped[axis] = index[axis].clamp(0, last);
        }
        clamped
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of_geometry(self)
    }
}

fn validate_directions(directions: &Mat3) -> Result<(), GeometryError> {
    for axis in 0..3 {
        let length = directions.col(axis).length();
        if (length - 1.0).abs() > ORTHONORMAL_TOLERANCE {
            return Err(GeometryError::NonUnitAxis { axis, length });
        }
    }
    for (first, second) in [(0, 1), (0, 2), (1, 2)] {
        if directions.col(first).dot(directions.col(second)).abs() > ORTHONORMAL_TOLERANCE {
            return Err(GeometryError::NonOrthogonalAxes { first, second });
        }
    }
    Ok(())
}

/// Physical extent spanned by voxel centers, per world axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

/// Axis-aligned rectangle in plane space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaneRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Self {
                    min: point,
                    max: point,
                },
                Some(b) => Self {
                    min: b.min.min(point),
                    max: b.max.max(point),
                },
            })
        })
    }

    /// Box through the eight corner voxel centers.
    pub fn of_geometry(geometry: &ImageGeometry) -> Self {
        let extent = geometry.extent();
        let last = |axis: usize| extent[axis].saturating_sub(1) as i32;

        let corners = (0..8).map(|corner| {
            let pick = |axis: usize| if corner & (1 << axis) != 0 { last(axis) } else { 0 };
            geometry
                .index_to_physical(IVec4::new(pick(0), pick(1), pick(2), 0))
                .truncate()
        });

        Self::from_points(corners).unwrap_or(Self {
            min: geometry.origin(),
            max: geometry.origin(),
        })
    }

    /// Smallest box enclosing all images, `None` for an empty set.
    pub fn enclosing<'a>(geometries: impl IntoIterator<Item = &'a ImageGeometry>) -> Option<Self> {
        geometries
            .into_iter()
            .map(Self::of_geometry)
            .reduce(|a, b| a.union(&b))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Rectangle covered by this box in `plane` space.
    pub fn project(&self, plane: PlaneOrientation) -> PlaneRect {
        let transform = plane.transform();
        let corners = (0..8).map(|corner| {
            let pick = |axis: usize| {
                if corner & (1 << axis) != 0 {
                    self.max[axis]
                } else {
                    self.min[axis]
                }
            };
            transform.transform_vector3(Vec3::new(pick(0), pick(1), pick(2)))
        });

        match Self::from_points(corners) {
            Some(projected) => PlaneRect {
                x: projected.min.x,
                y: projected.min.y,
                width: projected.max.x - projected.min.x,
                height: projected.max.y - projected.min.y,
            },
            None => PlaneRect::default(),
        }
    }
}
