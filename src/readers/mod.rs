pub mod column_layout;
pub mod station_reader;

pub use column_layout::{Column, ColumnLayout};
pub use station_reader::{decode_listing, ParsedStations, StationReader};
