pub mod basemap;
pub mod coords;
pub mod source;

pub use basemap::Basemap;
pub use coords::{lat_to_y, lon_to_x, TileCoords, TileRange};
pub use source::{ClientIdentity, HttpTileSource, TileSource};
