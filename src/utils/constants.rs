/// File names
pub const STATIONS_FILE: &str = "asos-stations.txt";
pub const CONFIG_FILE: &str = "asos-map.toml";
pub const OUTPUT_DIR: &str = "output";

/// Listing layout: row indices within the fixed-width file
pub const HEADER_ROW: usize = 2;
pub const DIVIDER_ROW: usize = 3;
pub const FIRST_DATA_ROW: usize = 4;

/// Positional field indices within a data row
pub const CALL_SIGN_FIELD: usize = 3;
pub const NAME_FIELD: usize = 4;
pub const LATITUDE_FIELD: usize = 9;
pub const LONGITUDE_FIELD: usize = 10;
pub const ELEVATION_FIELD: usize = 11;

/// NYC bounds: [min_lon, max_lon, min_lat, max_lat]
pub const NYC_EXTENT: [f64; 4] = [-74.257159, -73.699215, 40.495992, 40.915568];

/// Tile server defaults
pub const DEFAULT_TILE_URL: &str = "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}.png";
pub const DEFAULT_USER_AGENT: &str = "Anaconda 3";
pub const TILE_SIZE: u32 = 256;
pub const MAX_ZOOM: u32 = 19;

/// Empirical zoom heuristic constants
pub const ZOOM_SCALE: f64 = std::f64::consts::SQRT_2;
pub const ZOOM_REFERENCE_SPAN: f64 = 350.0;

/// Label placement
pub const DEFAULT_LABEL_JITTER: f64 = 0.01;

/// Figure defaults (12x9 inches at 100 dpi)
pub const DEFAULT_FIGURE_WIDTH: u32 = 1200;
pub const DEFAULT_FIGURE_HEIGHT: u32 = 900;
pub const DEFAULT_TITLE: &str = "ASOS Station Map";
pub const MAP_TICK_COUNT: usize = 7;
