use crate::utils::constants::OUTPUT_DIR;
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default map filename with format: asos-station-map-{YYMMDD}.png
pub fn generate_default_map_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("asos-station-map-{:02}{:02}{:02}.png", year, month, day);
    PathBuf::from(OUTPUT_DIR).join(filename)
}
