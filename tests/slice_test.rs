mod common;

use std::f32::consts::FRAC_PI_4;

use common::{gradient_volume, uniform_volume};
use glam::{IVec4, Mat3, Vec3};
use ndarray::{Array4, array};
use vast_view::{
    DEFAULT_ALIGNMENT, ExtractionMode, ImageGeometry, PlaneOrientation, SliceBuffer, ViewState,
    Volume, aligned_size, extract_slice,
};

fn extract(volume: &Volume<u16>, plane: PlaneOrientation, voxel: IVec4) -> (SliceBuffer<u16>, ExtractionMode) {
    let mapping = volume.geometry().mapping(plane);
    let mut slice = SliceBuffer::for_plane(&mapping, DEFAULT_ALIGNMENT);
    let state = ViewState::at_voxel(volume.geometry(), voxel);
    let mode = extract_slice(volume, plane, &state, &mut slice);
    (slice, mode)
}

#[test]
fn test_aligned_size() {
    assert_eq!(aligned_size(0, 32), 0);
    assert_eq!(aligned_size(1, 32), 32);
    assert_eq!(aligned_size(32, 32), 32);
    assert_eq!(aligned_size(33, 32), 64);
    assert_eq!(aligned_size(7, 0), 7);
}

#[test]
fn test_buffer_container_is_padded() {
    let volume = gradient_volume(4, Mat3::IDENTITY);
    let (slice, _) = extract(&volume, PlaneOrientation::Axial, IVec4::new(0, 0, 1, 0));

    assert_eq!((slice.width(), slice.height()), (4, 4));
    assert_eq!(slice.container_dim(), (32, 32));
    assert_eq!(slice.get(4, 0), None);
    assert_eq!(slice.data()[[0, 4]], 0);
}

#[test]
fn test_axial_slice_identity_orientation() {
    let volume = gradient_volume(4, Mat3::IDENTITY);
    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(1, 1, 2, 0));

    assert_eq!(mode, ExtractionMode::Aligned);
    assert_eq!(
        slice.valid_region(),
        array![
            [200, 201, 202, 203],
            [210, 211, 212, 213],
            [220, 221, 222, 223],
            [230, 231, 232, 233],
        ]
    );
}

#[test]
fn test_sagittal_slice_identity_orientation() {
    let volume = gradient_volume(4, Mat3::IDENTITY);
    let (slice, _) = extract(&volume, PlaneOrientation::Sagittal, IVec4::new(1, 1, 2, 0));

    assert_eq!(
        slice.valid_region(),
        array![
            [1, 11, 21, 31],
            [101, 111, 121, 131],
            [201, 211, 221, 231],
            [301, 311, 321, 331],
        ]
    );
}

#[test]
fn test_coronal_slice_identity_orientation() {
    let volume = gradient_volume(4, Mat3::IDENTITY);
    let (slice, _) = extract(&volume, PlaneOrientation::Coronal, IVec4::new(1, 1, 2, 0));

    assert_eq!(
        slice.valid_region(),
        array![
            [10, 11, 12, 13],
            [110, 111, 112, 113],
            [210, 211, 212, 213],
            [310, 311, 312, 313],
        ]
    );
}

#[test]
fn test_sagittal_slice_mirrored_orientation() {
    let volume = gradient_volume(4, Mat3::from_cols(Vec3::NEG_X, Vec3::Y, Vec3::Z));
    let mapping = volume.geometry().mapping(PlaneOrientation::Sagittal);
    let (slice, mode) = extract(&volume, PlaneOrientation::Sagittal, IVec4::new(1, 1, 2, 0));

    assert_eq!(mode, ExtractionMode::Aligned);
    assert!(!mapping.is_flipped(0));
    assert!(mapping.is_flipped(1));
    assert!(mapping.is_flipped(2));
    // depth runs against voxel x, the buffer still holds native order
    assert_eq!(mapping.to_plane(IVec4::new(1, 1, 2, 0)).z, 2);
    assert_eq!(
        slice.valid_region(),
        array![
            [1, 11, 21, 31],
            [101, 111, 121, 131],
            [201, 211, 221, 231],
            [301, 311, 321, 331],
        ]
    );
}

#[test]
fn test_coronal_slice_mirrored_orientation() {
    let volume = gradient_volume(4, Mat3::from_cols(Vec3::NEG_X, Vec3::Y, Vec3::Z));
    let mapping = volume.geometry().mapping(PlaneOrientation::Coronal);
    let (slice, _) = extract(&volume, PlaneOrientation::Coronal, IVec4::new(1, 1, 2, 0));

    // the mirrored x axis cancels the coronal left/right flip
    assert!(!mapping.is_flipped(0));
    assert!(mapping.is_flipped(1));
    assert_eq!(
        slice.valid_region(),
        array![
            [10, 11, 12, 13],
            [110, 111, 112, 113],
            [210, 211, 212, 213],
            [310, 311, 312, 313],
        ]
    );
}

#[test]
fn test_coronal_slice_rotated_orientation() {
    // voxel x runs along world y, voxel y against world x
    let volume = gradient_volume(4, Mat3::from_cols(Vec3::Y, Vec3::NEG_X, Vec3::Z));
    let mapping = volume.geometry().mapping(PlaneOrientation::Coronal);
    let (slice, _) = extract(&volume, PlaneOrientation::Coronal, IVec4::new(1, 2, 3, 0));

    assert_eq!([0, 1, 2].map(|axis| mapping.source_axis(axis)), [1, 2, 0]);
    assert!(!mapping.is_flipped(0));
    assert!(mapping.is_flipped(1));
    assert!(!mapping.is_flipped(2));
    assert_eq!(
        slice.valid_region(),
        array![
            [1, 11, 21, 31],
            [101, 111, 121, 131],
            [201, 211, 221, 231],
            [301, 311, 321, 331],
        ]
    );
}

#[test]
fn test_axial_slice_swapped_orientation() {
    // voxel x runs along world y and voxel y along world x
    let volume = gradient_volume(4, Mat3::from_cols(Vec3::Y, Vec3::X, Vec3::Z));
    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(1, 1, 2, 0));

    assert_eq!(mode, ExtractionMode::Aligned);
    assert_eq!(
        slice.valid_region(),
        array![
            [200, 210, 220, 230],
            [201, 211, 221, 231],
            [202, 212, 222, 232],
            [203, 213, 223, 233],
        ]
    );
}

#[test]
fn test_out_of_slab_leaves_zeros() {
    let volume = gradient_volume(4, Mat3::IDENTITY);

    for voxel in [IVec4::new(1, 1, 7, 0), IVec4::new(1, 1, -1, 0)] {
        let (slice, _) = extract(&volume, PlaneOrientation::Axial, voxel);
        assert!(slice.valid_region().iter().all(|&v| v == 0));
    }
}

#[test]
fn test_previous_content_is_cleared() {
    let volume = gradient_volume(4, Mat3::IDENTITY);
    let mapping = volume.geometry().mapping(PlaneOrientation::Axial);
    let mut slice = SliceBuffer::for_plane(&mapping, DEFAULT_ALIGNMENT);

    let inside = ViewState::at_voxel(volume.geometry(), IVec4::new(0, 0, 3, 0));
    extract_slice(&volume, PlaneOrientation::Axial, &inside, &mut slice);
    assert_eq!(slice.get(3, 3), Some(333));

    let outside = ViewState::at_voxel(volume.geometry(), IVec4::new(0, 0, 9, 0));
    extract_slice(&volume, PlaneOrientation::Axial, &outside, &mut slice);
    assert_eq!(slice.get(3, 3), Some(0));
}

#[test]
fn test_time_index_selects_frame() {
    let data = Array4::from_shape_fn((3, 2, 2, 2), |(t, _, _, _)| (t as u16 + 1) * 1000);
    let geometry = ImageGeometry::axis_aligned([2, 2, 2, 3], [1.0; 3]).expect("valid geometry");
    let volume = Volume::new(data, geometry).expect("shape matches");

    let (slice, _) = extract(&volume, PlaneOrientation::Axial, IVec4::new(0, 0, 0, 2));
    assert!(slice.valid_region().iter().all(|&v| v == 3000));
}

#[test]
fn test_oblique_uniform_volume_has_no_holes() {
    let mut volume = uniform_volume([8, 8, 4], 7);
    let rotated = volume
        .geometry()
        .reoriented(Mat3::from_rotation_z(FRAC_PI_4))
        .expect("rotation is orthonormal");
    volume.set_geometry(rotated).expect("same extent");

    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(3, 3, 2, 0));

    assert_eq!(mode, ExtractionMode::Oblique);
    assert_eq!((slice.width(), slice.height()), (8, 8));
    assert!(slice.valid_region().iter().all(|&v| v == 7));
    assert_eq!(slice.data()[[0, 8]], 0);
}

#[test]
fn test_oblique_small_rotation_keeps_values() {
    let volume = gradient_volume(6, Mat3::IDENTITY);
    let geometry = volume
        .geometry()
        .reoriented(Mat3::from_rotation_z(5f32.to_radians()))
        .expect("rotation is orthonormal");
    let data = volume.data().clone();
    let volume = Volume::new(data, geometry).expect("shape matches");

    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(2, 2, 3, 0));

    assert_eq!(mode, ExtractionMode::Oblique);
    // every copied pixel holds the voxel it is indexed by
    for y in 0..6 {
        for x in 0..6 {
            let value = slice.get(x, y).expect("inside the plane");
            assert!(value == 0 || value == (x + 10 * y + 300) as u16);
        }
    }
    assert_eq!(slice.get(2, 2), Some(322));
}

#[test]
fn test_empty_time_axis_renders_nothing() {
    let geometry = ImageGeometry::axis_aligned([4, 4, 4, 0], [1.0; 3]).expect("valid geometry");
    let volume = Volume::new(Array4::<u16>::zeros((0, 4, 4, 4)), geometry).expect("shape matches");

    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(1, 1, 1, 0));
    assert_eq!(mode, ExtractionMode::Aligned);
    assert!(slice.valid_region().iter().all(|&v| v == 0));
}

#[test]
fn test_empty_volume_in_oblique_mode_renders_nothing() {
    let geometry = ImageGeometry::axis_aligned([4, 4, 4, 0], [1.0; 3])
        .and_then(|g| g.reoriented(Mat3::from_rotation_z(FRAC_PI_4)))
        .expect("valid geometry");
    let volume = Volume::new(Array4::<u16>::zeros((0, 4, 4, 4)), geometry).expect("shape matches");

    let (slice, mode) = extract(&volume, PlaneOrientation::Axial, IVec4::new(1, 1, 1, 0));
    assert_eq!(mode, ExtractionMode::Oblique);
    assert!(slice.valid_region().iter().all(|&v| v == 0));
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let geometry = ImageGeometry::axis_aligned([4, 4, 4, 1], [1.0; 3]).expect("valid geometry");
    let result = Volume::new(Array4::<u16>::zeros((1, 4, 4, 5)), geometry);
    assert!(result.is_err());
}

#[test]
fn test_slice_to_image() {
    let volume = uniform_volume([5, 3, 2], u16::MAX);
    let (slice, _) = extract(&volume, PlaneOrientation::Axial, IVec4::new(0, 0, 1, 0));

    let image = slice.to_image().expect("valid region matches size");
    assert_eq!(image.dimensions(), (5, 3));
    assert!(image.pixels().all(|p| p.0[0] == 255));
}
