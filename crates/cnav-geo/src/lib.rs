//! courtnav geography
//!
//! Coordinates, court records, great-circle math and the device position
//! provider shared by the routing, map and navigation crates.

mod bounds;
mod coord;
mod court;
mod great_circle;
pub mod position;

pub use bounds::Bounds;
pub use coord::Coordinate;
pub use court::{Court, UserPosition};
pub use great_circle::{haversine_km, haversine_meters, initial_bearing, Heading, EARTH_RADIUS_KM};
pub use position::{
    Fix, FixOptions, LocationError, Locator, PermissionPrompt, PermissionState, PositionProvider,
    SensorError,
};

/// Geographic validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    OutOfRange { lat: f64, lng: f64 },

    #[error("invalid rating: {0}")]
    InvalidRating(f64),

    #[error("expected \"lat,lng\", got {0:?}")]
    Parse(String),
}

/// Milliseconds since the UNIX epoch
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
