use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{IVec4, Mat3};
use ndarray::Array3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vast_view::{
    Crosshair, DrawSurface, ImageGeometry, PlaneOrientation, SliceBuffer, ViewState, ViewerOptions,
    Volume, draw_transform, extract_slice, layout_viewport,
};
use web_time::Instant;

#[derive(Parser)]
#[command(name = "vast-view", about = "Render one plane of a synthetic phantom")]
struct Cli {
    /// Viewer options (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plane to render, overrides the config
    #[arg(short, long)]
    plane: Option<PlaneOrientation>,

    /// Zoom factor, overrides the config
    #[arg(short, long)]
    zoom: Option<f32>,

    /// Rotate the phantom about its z axis after loading (degrees)
    #[arg(long, default_value_t = 0.0)]
    rotate: f32,

    /// Phantom edge length in voxels
    #[arg(long, default_value_t = 64)]
    size: usize,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 512)]
    height: u32,

    #[arg(short, long, default_value = "slice.png")]
    output: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

/// Bright ellipsoid with a darker off-center core, so flips are visible.
fn phantom(size: usize) -> Array3<u16> {
    let center = size as f32 / 2.0;
    Array3::from_shape_fn((size, size, size), |(z, y, x)| {
        let d = |v: usize, c: f32, r: f32| (v as f32 - c) / r;
        let outer = d(x, center, center * 0.9).powi(2)
            + d(y, center, center * 0.7).powi(2)
            + d(z, center, center * 0.8).powi(2);
        let core = d(x, center * 0.6, center * 0.2).powi(2)
            + d(y, center, center * 0.2).powi(2)
            + d(z, center, center * 0.2).powi(2);

        if core <= 1.0 {
            20_000
        } else if outer <= 1.0 {
            50_000
        } else {
            0
        }
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut options = match &cli.config {
        Some(path) => ViewerOptions::load(path)
            .with_context(|| format!("reading viewer options from {}", path.display()))?,
        None => ViewerOptions::default(),
    };
    if let Some(plane) = cli.plane {
        options.plane = plane;
    }
    if let Some(zoom) = cli.zoom {
        options.zoom = zoom;
    }
    options.validate()?;

    let size = cli.size;
    let geometry = ImageGeometry::axis_aligned([size, size, size, 1], [1.0, 1.0, 1.0])?;
    let mut volume = Volume::from_frame(phantom(size), geometry)?;
    if cli.rotate != 0.0 {
        let rotated = volume
            .geometry()
            .reoriented(Mat3::from_rotation_z(cli.rotate.to_radians()))?;
        volume.set_geometry(rotated)?;
    }

    let half = size as i32 / 2;
    let state = ViewState::at_voxel(volume.geometry(), IVec4::new(half, half, half, 0))
        .with_zoom(options.zoom)
        .with_recenter(options.recenter);

    let mapping = volume.geometry().mapping(options.plane);
    let mut slice = SliceBuffer::for_plane(&mapping, options.buffer_alignment);

    let start = Instant::now();
    let mode = extract_slice(&volume, options.plane, &state, &mut slice);
    info!(
        plane = %options.plane,
        ?mode,
        width = slice.width(),
        height = slice.height(),
        container = ?slice.container_dim(),
        elapsed = ?start.elapsed(),
        "Slice extracted"
    );

    let surface = DrawSurface::new(cli.width, cli.height);
    let viewport = layout_viewport(volume.geometry(), options.plane, surface, &state);
    let transform = draw_transform(&viewport, &mapping);
    info!(?viewport, ?transform, "Viewport");

    if let Some(crosshair) =
        Crosshair::at_voxel(state.voxel_coords, &viewport, &mapping, options.crosshair_gap)
    {
        info!(center = ?crosshair.center, segments = ?crosshair.segments(surface), "Crosshair");
    }

    let image = slice.to_image().context("slice buffer does not match its size")?;
    image
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "Slice saved");

    Ok(())
}
