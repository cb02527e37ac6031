//! Route model and the great-circle estimate

use cnav_geo::{haversine_km, Coordinate};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_FALLBACK_SPEED_KMH;

/// Travel route between the user and a court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<Coordinate>,
    /// Geometry is a straight two-point segment, not a road path
    pub is_approximate: bool,
}

impl Route {
    /// Straight segment with a duration estimated at `speed_kmh`
    pub fn great_circle(origin: Coordinate, destination: Coordinate, speed_kmh: f64) -> Self {
        let distance_km = haversine_km(origin, destination);
        let minutes = estimate_minutes(distance_km, speed_kmh);

        Self {
            distance_meters: distance_km * 1000.0,
            duration_seconds: minutes * 60.0,
            geometry: vec![origin, destination],
            is_approximate: true,
        }
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.geometry.first().copied()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.geometry.last().copied()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

/// Whole minutes to cover `distance_km` at `speed_kmh`, rounded up.
///
/// Non-positive or non-finite speeds fall back to the default speed.
pub fn estimate_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    let speed = if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        DEFAULT_FALLBACK_SPEED_KMH
    };
    (distance_km / speed * 60.0).ceil()
}
