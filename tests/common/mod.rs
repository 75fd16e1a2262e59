#![allow(dead_code)]

use glam::Mat3;
use ndarray::Array3;
use vast_view::{ImageGeometry, Volume};

/// Cube of `size` voxels where each voxel stores `x + 10 y + 100 z`.
pub fn gradient_volume(size: usize, directions: Mat3) -> Volume<u16> {
    let data = Array3::from_shape_fn((size, size, size), |(z, y, x)| (x + 10 * y + 100 * z) as u16);
    let geometry = ImageGeometry::new([size, size, size, 1], [1.0; 3], [0.0; 3], directions)
        .expect("valid geometry");
    Volume::from_frame(data, geometry).expect("shape matches geometry")
}

/// Volume filled with a single value.
pub fn uniform_volume(extent: [usize; 3], value: u16) -> Volume<u16> {
    let [x, y, z] = extent;
    let geometry = ImageGeometry::axis_aligned([x, y, z, 1], [1.0; 3]).expect("valid geometry");
    Volume::from_frame(Array3::from_elem((z, y, x), value), geometry).expect("shape matches")
}
