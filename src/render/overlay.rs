use crate::error::{MapError, Result};
use crate::models::{BoundingExtent, StationRecord};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
}

/// A station name placed at `(lon, lat)`; `lat` already includes the jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub lon: f64,
    pub lat: f64,
}

/// What gets drawn on top of the basemap.
///
/// Every station gets a marker, but only stations strictly inside the
/// extent get a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOverlay {
    pub markers: Vec<Marker>,
    pub labels: Vec<Label>,
}

impl MapOverlay {
    /// Build the overlay, nudging each label's latitude by `N(0, jitter_sigma)`
    /// degrees drawn from `rng` to reduce overlap between neighbours.
    pub fn plan<R: Rng + ?Sized>(
        stations: &[StationRecord],
        extent: &BoundingExtent,
        jitter_sigma: f64,
        rng: &mut R,
    ) -> Result<Self> {
        // Normal::new accepts a negative std_dev, so range-check here
        if !(jitter_sigma.is_finite() && jitter_sigma >= 0.0) {
            return Err(MapError::InvalidSetting(format!(
                "label jitter sigma must be finite and non-negative, got {}",
                jitter_sigma
            )));
        }
        let jitter = Normal::new(0.0, jitter_sigma).map_err(|e| {
            MapError::InvalidSetting(format!("label jitter sigma {}: {}", jitter_sigma, e))
        })?;

        let markers = stations
            .iter()
            .map(|s| Marker {
                lon: s.longitude,
                lat: s.latitude,
            })
            .collect();

        let mut labels = Vec::new();
        for station in stations {
            if !extent.contains_strict(station.longitude, station.latitude) {
                continue;
            }

            info!("{}", station.name);
            labels.push(Label {
                text: station.name.clone(),
                lon: station.longitude,
                lat: station.latitude + jitter.sample(rng),
            });
        }

        Ok(Self { markers, labels })
    }
}
