use crate::error::{RegionError, Result};
use railway_data::BoundingBox;
use serde::{Deserialize, Serialize};

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(RegionError::InvalidCoordinates(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Square box of `half_extent_deg` degrees on each side of the point
    pub fn bounding_box(&self, half_extent_deg: f64) -> Result<BoundingBox> {
        if !half_extent_deg.is_finite() || half_extent_deg <= 0.0 {
            return Err(RegionError::InvalidExtent(half_extent_deg));
        }
        Ok(BoundingBox::new(
            self.longitude - half_extent_deg,
            self.latitude - half_extent_deg,
            self.longitude + half_extent_deg,
            self.latitude + half_extent_deg,
        )?)
    }
}
