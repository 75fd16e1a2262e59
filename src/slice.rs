use std::f32::consts::FRAC_1_SQRT_2;

use glam::IVec4;
use image::ImageBuffer;
use image::Luma;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::s;
use rayon::prelude::*;
use tracing::debug;

use crate::enums::ExtractionMode;
use crate::enums::PlaneOrientation;
use crate::orientation::PlaneMapping;
use crate::viewport::ViewState;
use crate::volume::Volume;

/// Row and column alignment of slice containers.
pub const DEFAULT_ALIGNMENT: usize = 32;

/// Oblique sampling step relative to the voxel size. Calibration constant.
pub const OBLIQUE_STEP_FACTOR: f32 = FRAC_1_SQRT_2;

/// Round `size` up to the next multiple of `alignment`.
pub fn aligned_size(size: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

/// 2D slice in native voxel order.
///
/// The container is padded to the alignment boundary; only the leading
/// `width` x `height` region carries slice content.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceBuffer<T> {
    data: Array2<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> SliceBuffer<T> {
    pub fn new(width: usize, height: usize, alignment: usize) -> Self {
        let shape = (aligned_size(height, alignment), aligned_size(width, alignment));
        Self {
            data: Array2::from_elem(shape, T::default()),
            width,
            height,
        }
    }

    /// Buffer sized for the plane `mapping` projects onto.
    pub fn for_plane(mapping: &PlaneMapping, alignment: usize) -> Self {
        let [width, height, _] = mapping.plane_size();
        Self::new(width, height, alignment)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Padded container size as (width, height).
    pub fn container_dim(&self) -> (usize, usize) {
        let (rows, cols) = self.data.dim();
        (cols, rows)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[[y, x]])
        } else {
            None
        }
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// The part of the container holding slice content.
    pub fn valid_region(&self) -> ArrayView2<'_, T> {
        self.data.slice(s![..self.height, ..self.width])
    }

    pub fn clear(&mut self) {
        self.data.fill(T::default());
    }
}

impl SliceBuffer<u16> {
    #[inline]
    fn normalize_to_u8(value: u16) -> u8 {
        ((value as f32 / 65535.0) * 255.0).clamp(0.0, 255.0) as u8
    }

    /// Valid region as an 8-bit grayscale image.
    pub fn to_image(&self) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let pixel_data: Vec<u8> = self
            .valid_region()
            .iter()
            .map(|&v| Self::normalize_to_u8(v))
            .collect();
        ImageBuffer::from_raw(self.width as u32, self.height as u32, pixel_data)
    }
}

/// Copy the slice through the current view position into `out`.
///
/// `out` is cleared first. Voxels that fall outside the volume leave their
/// pixel at the default value.
pub fn extract_slice<T>(
    volume: &Volume<T>,
    plane: PlaneOrientation,
    state: &ViewState,
    out: &mut SliceBuffer<T>,
) -> ExtractionMode
where
    T: Copy + Default + Send + Sync,
{
    let geometry = volume.geometry();
    let mapping = geometry.mapping(plane);
    out.clear();

    let mode = if geometry.is_aligned() {
        ExtractionMode::Aligned
    } else {
        ExtractionMode::Oblique
    };

    if geometry.extent().contains(&0) {
        debug!(plane = %plane, extent = ?geometry.extent(), "Empty volume, nothing to copy");
        return mode;
    }

    match mode {
        ExtractionMode::Aligned => fill_aligned(volume, &mapping, state, out),
        ExtractionMode::Oblique => fill_oblique(volume, &mapping, state, out),
    }
    mode
}

fn time_index<T: Copy>(volume: &Volume<T>, state: &ViewState) -> usize {
    volume.geometry().clamp(state.voxel_coords).w as usize
}

fn fill_aligned<T>(
    volume: &Volume<T>,
    mapping: &PlaneMapping,
    state: &ViewState,
    out: &mut SliceBuffer<T>,
) where
    T: Copy + Default + Send + Sync,
{
    let extent = volume.geometry().extent();
    let [x_axis, y_axis, depth_axis] = [0, 1, 2].map(|axis| mapping.source_axis(axis));
    let depth = state.voxel_coords[depth_axis];

    if depth < 0 || depth as usize >= extent[depth_axis] {
        debug!(plane = %mapping.plane(), depth, "Slice outside of volume, nothing to copy");
        return;
    }

    let [plane_width, plane_height, _] = mapping.plane_size();
    let width = out.width.min(plane_width);
    let height = out.height.min(plane_height);
    debug!(plane = %mapping.plane(), width, height, depth, "Aligned slice extraction");

    let frame = volume.frame(time_index(volume, state));
    let depth = depth as usize;
    let mut region = out.data.slice_mut(s![..height, ..width]);

    region
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let mut source = [0usize; 3];
                source[x_axis] = x;
                source[y_axis] = y;
                source[depth_axis] = depth;
                *pixel = frame[[source[2], source[1], source[0]]];
            }
        });
}

fn sample_count(min: f32, max: f32, step: f32) -> usize {
    if !(step > 0.0 && step.is_finite()) || max < min {
        return 0;
    }
    ((max - min) / step + 1e-4).floor() as usize + 1
}

fn fill_oblique<T>(
    volume: &Volume<T>,
    mapping: &PlaneMapping,
    state: &ViewState,
    out: &mut SliceBuffer<T>,
) where
    T: Copy + Default,
{
    let geometry = volume.geometry();
    let bounds = geometry.bounding_box();
    let voxel_size = geometry.voxel_size();
    let [world_i, world_j, _] = mapping.plane().world_axes();
    let (x_axis, y_axis) = (mapping.source_axis(0), mapping.source_axis(1));

    let step_i = OBLIQUE_STEP_FACTOR * voxel_size[x_axis];
    let step_j = OBLIQUE_STEP_FACTOR * voxel_size[y_axis];
    let count_i = sample_count(bounds.min[world_i], bounds.max[world_i], step_i);
    let count_j = sample_count(bounds.min[world_j], bounds.max[world_j], step_j);
    debug!(plane = %mapping.plane(), count_i, count_j, "Oblique slice extraction");

    let time = time_index(volume, state);
    let frame = volume.frame(time);
    let mut physical = state.physical_coords;
    physical.w = time as f32;

    for j in 0..count_j {
        physical[world_j] = bounds.min[world_j] + j as f32 * step_j;
        for i in 0..count_i {
            physical[world_i] = bounds.min[world_i] + i as f32 * step_i;
            let index: IVec4 = geometry.physical_to_index(physical);
            if !geometry.contains(index) {
                continue;
            }

            let (x, y) = (index[x_axis] as usize, index[y_axis] as usize);
            if x < out.width && y < out.height {
                out.data[[y, x]] = frame[[index.z as usize, index.y as usize, index.x as usize]];
            }
        }
    }
}
