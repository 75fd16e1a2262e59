use crate::error::GeometryError;
use crate::geometry::ImageGeometry;

use glam::IVec4;
use ndarray::Array3;
use ndarray::Array4;
use ndarray::ArrayView3;
use ndarray::Axis;
use ndarray::s;

/// Voxel data plus the geometry that places it in physical space.
pub struct Volume<T> {
    data: Array4<T>,
    geometry: ImageGeometry,
}

impl<T: Copy> Volume<T> {
    /// Wrap voxel data laid out as (time, depth, height, width)
    ///
    /// # Errors
    ///
    /// Returns error if the data shape does not match the geometry extent
    pub fn new(data: Array4<T>, geometry: ImageGeometry) -> Result<Self, GeometryError> {
        let (t, z, y, x) = data.dim();
        let actual = [x, y, z, t];
        if actual != geometry.extent() {
            return Err(GeometryError::ShapeMismatch {
                expected: geometry.extent(),
                actual,
            });
        }
        Ok(Self { data, geometry })
    }

    /// Wrap a single time step laid out as (depth, height, width)
    pub fn from_frame(data: Array3<T>, geometry: ImageGeometry) -> Result<Self, GeometryError> {
        Self::new(data.insert_axis(Axis(0)), geometry)
    }

    /// Get the dimensions of the volume (time, depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array4<T> {
        &self.data
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// Replace the geometry, e.g. after registration rotated the image
    pub fn set_geometry(&mut self, geometry: ImageGeometry) -> Result<(), GeometryError> {
        if geometry.extent() != self.geometry.extent() {
            return Err(GeometryError::ShapeMismatch {
                expected: self.geometry.extent(),
                actual: geometry.extent(),
            });
        }
        self.geometry = geometry;
        Ok(())
    }

    /// One time step as (depth, height, width)
    pub fn frame(&self, time: usize) -> ArrayView3<'_, T> {
        self.data.slice(s![time, .., .., ..])
    }

    /// Voxel at (x, y, z, t), `None` outside the volume
    pub fn voxel(&self, index: IVec4) -> Option<T> {
        if !self.geometry.contains(index) {
            return None;
        }
        Some(self.data[[
            index.w as usize,
            index.z as usize,
            index.y as usize,
            index.x as usize,
        ]])
    }
}
