use crate::models::BoundingExtent;
use crate::utils::constants::{MAX_ZOOM, ZOOM_REFERENCE_SPAN, ZOOM_SCALE};

/// Unclamped empirical zoom for a longitude span in degrees:
/// `ceil(-sqrt(2) * ln((span / 2) / 350))`.
pub fn raw_zoom(lon_span: f64) -> f64 {
    (-ZOOM_SCALE * ((lon_span / 2.0) / ZOOM_REFERENCE_SPAN).ln()).ceil()
}

/// Tile zoom level for a longitude span. Anything that is not below 20,
/// including NaN and infinity, becomes exactly 19.
pub fn zoom_for_span(lon_span: f64) -> u32 {
    let raw = raw_zoom(lon_span);
    if raw < 20.0 {
        // Longitude spans of at most 360 degrees always give at least 1
        raw.max(0.0) as u32
    } else {
        MAX_ZOOM
    }
}

pub fn zoom_for_extent(extent: &BoundingExtent) -> u32 {
    zoom_for_span(extent.lon_span())
}
