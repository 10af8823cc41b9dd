use crate::error::Result;
use crate::models::{BoundingExtent, StationRecord};
use crate::render::map_renderer::{FigureSettings, MapRenderer};
use crate::render::overlay::MapOverlay;
use crate::render::zoom::zoom_for_extent;
use crate::tiles::{Basemap, TileSource};
use crate::utils::constants::DEFAULT_LABEL_JITTER;
use crate::utils::progress::ProgressReporter;
use rand::Rng;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub extent: BoundingExtent,
    pub jitter_sigma: f64,
    pub figure: FigureSettings,
    pub output: PathBuf,
}

impl RenderOptions {
    pub fn new(output: PathBuf) -> Self {
        Self {
            extent: BoundingExtent::nyc(),
            jitter_sigma: DEFAULT_LABEL_JITTER,
            figure: FigureSettings::default(),
            output,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub zoom: u32,
    pub tiles: usize,
    pub markers: usize,
    pub labels: usize,
    pub output: PathBuf,
}

/// Compute the zoom, fetch the basemap, plan the overlay and draw the map.
pub fn render_station_map<S, R>(
    stations: &[StationRecord],
    source: &S,
    options: &RenderOptions,
    rng: &mut R,
    progress: Option<&ProgressReporter>,
) -> Result<RenderSummary>
where
    S: TileSource + ?Sized,
    R: Rng + ?Sized,
{
    let zoom = zoom_for_extent(&options.extent);
    let basemap = Basemap::fetch(source, &options.extent, zoom, progress)?;
    let overlay = MapOverlay::plan(stations, &options.extent, options.jitter_sigma, rng)?;

    MapRenderer::new(options.figure.clone()).render(
        &basemap,
        &options.extent,
        &overlay,
        &options.output,
    )?;

    Ok(RenderSummary {
        zoom,
        tiles: basemap.range().len(),
        markers: overlay.markers.len(),
        labels: overlay.labels.len(),
        output: options.output.clone(),
    })
}
