use crate::error::{MapError, Result};

/// Parse a numeric listing field (latitude, longitude or elevation).
///
/// Surrounding whitespace is ignored; anything else that is not a float is
/// reported against the 0-based row it came from.
///
/// # Examples
/// ```
/// use asos_station_map::utils::parse_coordinate;
///
/// let lat = parse_coordinate(" 40.77898", 4, "latitude").unwrap();
/// assert!((lat - 40.77898).abs() < 1e-9);
/// ```
pub fn parse_coordinate(value: &str, row: usize, field: &'static str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| MapError::FieldParse {
        row,
        field,
        value: value.to_string(),
    })
}

/// Format a longitude tick label, e.g. `-74.2` becomes `74.2W`.
pub fn format_longitude(lon: f64) -> String {
    format_hemisphere(lon, 'E', 'W')
}

/// Format a latitude tick label, e.g. `40.6` becomes `40.6N`.
pub fn format_latitude(lat: f64) -> String {
    format_hemisphere(lat, 'N', 'S')
}

fn format_hemisphere(value: f64, positive: char, negative: char) -> String {
    let rounded = format!("{:.1}", value.abs());
    if rounded == "0.0" {
        return rounded;
    }
    let suffix = if value < 0.0 { negative } else { positive };
    format!("{}{}", rounded, suffix)
}

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}
