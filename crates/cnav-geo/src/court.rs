//! Court and user position records

use serde::{Deserialize, Serialize};

use crate::{Coordinate, GeoError};

/// Court snapshot supplied by the data service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub location: String,
    pub rating: f64,
    pub image_url: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Court {
    /// Check the coordinate range and a finite, non-negative rating
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.coordinate.is_valid() {
            return Err(GeoError::OutOfRange {
                lat: self.coordinate.lat,
                lng: self.coordinate.lng,
            });
        }
        if !(self.rating.is_finite() && self.rating >= 0.0) {
            return Err(GeoError::InvalidRating(self.rating));
        }
        Ok(())
    }
}

/// Device position captured for one directions session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    pub coordinate: Coordinate,
    pub accuracy_meters: f64,
    /// Milliseconds since the UNIX epoch
    pub captured_at: u64,
}

impl UserPosition {
    /// Position captured now
    pub fn new(coordinate: Coordinate, accuracy_meters: f64) -> Self {
        Self {
            coordinate,
            accuracy_meters,
            captured_at: crate::now_millis(),
        }
    }
}
