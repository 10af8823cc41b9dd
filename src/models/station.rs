use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of the ASOS station listing.
///
/// Records carry no identity beyond their position in the parsed list and
/// duplicates are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    #[validate(length(min = 1))]
    pub call_sign: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: f64,
}

impl StationRecord {
    pub fn new(
        call_sign: String,
        name: String,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Self {
        Self {
            call_sign,
            name,
            latitude,
            longitude,
            elevation,
        }
    }
}
