use crate::models::BoundingExtent;
use crate::utils::constants::TILE_SIZE;
use std::f64::consts::PI;
use std::fmt;

// --- Slippy Map / Mercator Math ---

/// Web Mercator x in world pixels at `zoom`.
pub fn lon_to_x(lon: f64, zoom: u32) -> f64 {
    ((lon + 180.0) / 360.0) * world_size(zoom)
}

/// Web Mercator y in world pixels at `zoom`, growing southwards.
pub fn lat_to_y(lat: f64, zoom: u32) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * world_size(zoom)
}

fn world_size(zoom: u32) -> f64 {
    2.0f64.powi(zoom as i32) * TILE_SIZE as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoords {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoords {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Fill a `{z}/{x}/{y}` URL template.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

impl fmt::Display for TileCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Inclusive block of tiles at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub z: u32,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// The tiles needed to cover `extent` at `zoom`.
    pub fn covering(extent: &BoundingExtent, zoom: u32) -> Self {
        let last = (1u32 << zoom) - 1;
        let tile = |world: f64| -> u32 {
            let index = (world / TILE_SIZE as f64).floor();
            (index.max(0.0) as u32).min(last)
        };

        Self {
            z: zoom,
            min_x: tile(lon_to_x(extent.min_lon, zoom)),
            max_x: tile(lon_to_x(extent.max_lon, zoom)),
            // North edge has the smaller y
            min_y: tile(lat_to_y(extent.max_lat, zoom)),
            max_y: tile(lat_to_y(extent.min_lat, zoom)),
        }
    }

    pub fn columns(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn rows(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn len(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World-pixel position of the range's top-left corner.
    pub fn origin(&self) -> (f64, f64) {
        (
            self.min_x as f64 * TILE_SIZE as f64,
            self.min_y as f64 * TILE_SIZE as f64,
        )
    }

    /// Row-major iteration, north to south then west to east.
    pub fn iter(&self) -> impl Iterator<Item = TileCoords> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| TileCoords::new(self.z, x, y)))
    }
}
