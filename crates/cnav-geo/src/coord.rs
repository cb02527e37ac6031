//! Geographic coordinates
//!
//! WGS84 latitude/longitude pairs as exchanged with the map surface and the
//! routing service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::great_circle::{haversine_km, initial_bearing};
use crate::GeoError;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside `[-90, 90]` / `[-180, 180]`
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let coord = Self { lat, lng };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::OutOfRange { lat, lng })
        }
    }

    /// Create a coordinate without range checks
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create from a GeoJSON `[lng, lat]` pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Result<Self, GeoError> {
        Self::new(pair[1], pair[0])
    }

    /// GeoJSON `[lng, lat]` pair
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Both components are finite and in range
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in kilometers
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }

    /// Initial bearing towards `other`, degrees clockwise from north
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        initial_bearing(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = GeoError;

    /// Parse `"lat,lng"`, the same shape [`fmt::Display`] writes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| GeoError::Parse(s.to_string()))?;
        let lat = lat.trim().parse().map_err(|_| GeoError::Parse(s.to_string()))?;
        let lng = lng.trim().parse().map_err(|_| GeoError::Parse(s.to_string()))?;
        Self::new(lat, lng)
    }
}
