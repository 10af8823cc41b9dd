use crate::error::{MapError, Result};
use crate::utils::constants::NYC_EXTENT;
use serde::{Deserialize, Serialize};

/// Geographic bounding box in degrees, ordered `[min_lon, max_lon, min_lat, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingExtent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingExtent {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Result<Self> {
        let all_finite = [min_lon, max_lon, min_lat, max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(MapError::InvalidExtent(
                "extent values must be finite".to_string(),
            ));
        }

        if !(-180.0..=180.0).contains(&min_lon) || !(-180.0..=180.0).contains(&max_lon) {
            return Err(MapError::InvalidExtent(format!(
                "longitudes must lie within [-180, 180], got [{}, {}]",
                min_lon, max_lon
            )));
        }

        // Web Mercator is undefined at the poles
        if !(-85.06..=85.06).contains(&min_lat) || !(-85.06..=85.06).contains(&max_lat) {
            return Err(MapError::InvalidExtent(format!(
                "latitudes must lie within [-85.06, 85.06], got [{}, {}]",
                min_lat, max_lat
            )));
        }

        if min_lon >= max_lon || min_lat >= max_lat {
            return Err(MapError::InvalidExtent(format!(
                "minimum must be below maximum, got lon [{}, {}] lat [{}, {}]",
                min_lon, max_lon, min_lat, max_lat
            )));
        }

        Ok(Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        })
    }

    /// The hardcoded New York City extent.
    pub fn nyc() -> Self {
        let [min_lon, max_lon, min_lat, max_lat] = NYC_EXTENT;
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Strict containment: points on any edge are outside.
    pub fn contains_strict(&self, lon: f64, lat: f64) -> bool {
        lon > self.min_lon && lon < self.max_lon && lat > self.min_lat && lat < self.max_lat
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
    }
}

impl Default for BoundingExtent {
    fn default() -> Self {
        Self::nyc()
    }
}

impl TryFrom<[f64; 4]> for BoundingExtent {
    type Error = MapError;

    fn try_from(values: [f64; 4]) -> Result<Self> {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl TryFrom<&[f64]> for BoundingExtent {
    type Error = MapError;

    fn try_from(values: &[f64]) -> Result<Self> {
        let values: [f64; 4] = values.try_into().map_err(|_| {
            MapError::InvalidExtent(format!(
                "expected 4 values (min_lon max_lon min_lat max_lat), got {}",
                values.len()
            ))
        })?;
        Self::try_from(values)
    }
}

impl From<BoundingExtent> for [f64; 4] {
    fn from(extent: BoundingExtent) -> Self {
        extent.as_array()
    }
}
