use crate::error::{MapError, Result};
use crate::models::BoundingExtent;
use crate::tiles::coords::{lat_to_y, lon_to_x, TileRange};
use crate::tiles::source::TileSource;
use crate::utils::constants::TILE_SIZE;
use crate::utils::progress::ProgressReporter;
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::info;

/// Mosaic of Web Mercator tiles covering a bounding extent.
pub struct Basemap {
    range: TileRange,
    mosaic: RgbImage,
}

impl Basemap {
    /// Fetch every tile covering `extent` at `zoom`, one request per tile.
    ///
    /// The first failing tile aborts the whole basemap.
    pub fn fetch<S: TileSource + ?Sized>(
        source: &S,
        extent: &BoundingExtent,
        zoom: u32,
        progress: Option<&ProgressReporter>,
    ) -> Result<Self> {
        let range = TileRange::covering(extent, zoom);
        info!(
            "Fetching {} tiles at zoom {} (x {}..={}, y {}..={})",
            range.len(),
            zoom,
            range.min_x,
            range.max_x,
            range.min_y,
            range.max_y
        );

        let mut mosaic = RgbImage::new(range.columns() * TILE_SIZE, range.rows() * TILE_SIZE);
        for coords in range.iter() {
            let mut tile = source.fetch_tile(&coords)?;
            if tile.dimensions() != (TILE_SIZE, TILE_SIZE) {
                tile = imageops::resize(&tile, TILE_SIZE, TILE_SIZE, FilterType::Triangle);
            }

            let x = (coords.x - range.min_x) * TILE_SIZE;
            let y = (coords.y - range.min_y) * TILE_SIZE;
            imageops::replace(&mut mosaic, &tile, x as i64, y as i64);

            if let Some(progress) = progress {
                progress.tile_fetched(&coords);
            }
        }

        Ok(Self { range, mosaic })
    }

    pub fn range(&self) -> &TileRange {
        &self.range
    }

    pub fn mosaic(&self) -> &RgbImage {
        &self.mosaic
    }

    /// Resample the mosaic onto a `width` x `height` raster that is linear in
    /// longitude and latitude over `extent`, so it lines up with a lon/lat chart.
    pub fn reproject(&self, extent: &BoundingExtent, width: u32, height: u32) -> Result<RgbImage> {
        if width == 0 || height == 0 {
            return Err(MapError::Plot(format!(
                "cannot reproject basemap onto a {}x{} area",
                width, height
            )));
        }

        let zoom = self.range.z;
        let (origin_x, origin_y) = self.range.origin();
        let max_x = self.mosaic.width() - 1;
        let max_y = self.mosaic.height() - 1;
        let to_pixel = |world: f64, origin: f64, max: u32| -> u32 {
            let pixel = (world - origin).floor();
            (pixel.max(0.0) as u32).min(max)
        };

        let columns: Vec<u32> = (0..width)
            .map(|px| {
                let lon = extent.min_lon + (px as f64 + 0.5) / width as f64 * extent.lon_span();
                to_pixel(lon_to_x(lon, zoom), origin_x, max_x)
            })
            .collect();

        let mut out = RgbImage::new(width, height);
        for py in 0..height {
            let lat = extent.max_lat - (py as f64 + 0.5) / height as f64 * extent.lat_span();
            let source_y = to_pixel(lat_to_y(lat, zoom), origin_y, max_y);
            for (px, source_x) in columns.iter().enumerate() {
                out.put_pixel(px as u32, py, *self.mosaic.get_pixel(*source_x, source_y));
            }
        }

        Ok(out)
    }
}
