//! Great-circle math
//!
//! Haversine distance and initial bearing on a spherical Earth.

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Mean Earth radius used by every distance in courtnav
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometers
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance in meters
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    haversine_km(from, to) * 1000.0
}

/// Initial bearing from `from` to `to` in degrees (0-360, clockwise from north)
pub fn initial_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let x = delta_lng.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Eight-point compass heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Heading {
    const ALL: [Heading; 8] = [
        Heading::N,
        Heading::NE,
        Heading::E,
        Heading::SE,
        Heading::S,
        Heading::SW,
        Heading::W,
        Heading::NW,
    ];

    /// Nearest compass point for a bearing in degrees
    pub fn from_bearing(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let index = ((normalized + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Heading::N => "N",
            Heading::NE => "NE",
            Heading::E => "E",
            Heading::SE => "SE",
            Heading::S => "S",
            Heading::SW => "SW",
            Heading::W => "W",
            Heading::NW => "NW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lng)
    }

    #[test]
    fn test_haversine_zero() {
        let a = coord(10.31, 123.90);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let pairs = [
            (coord(10.30, 123.89), coord(10.31, 123.90)),
            (coord(-33.86, 151.21), coord(51.51, -0.13)),
            (coord(0.0, 179.5), coord(0.0, -179.5)),
        ];
        for (a, b) in pairs {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    #[test]
    fn test_haversine_one_degree_longitude() {
        let d = haversine_km(coord(10.0, 123.0), coord(10.0, 124.0));
        assert!((d - 109.6).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_haversine_antipodal() {
        let d = haversine_km(coord(0.0, 0.0), coord(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinals() {
        let origin = coord(0.0, 0.0);
        assert!((initial_bearing(origin, coord(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing(origin, coord(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(origin, coord(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(origin, coord(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_from_bearing() {
        assert_eq!(Heading::from_bearing(0.0), Heading::N);
        assert_eq!(Heading::from_bearing(22.4), Heading::N);
        assert_eq!(Heading::from_bearing(22.6), Heading::NE);
        assert_eq!(Heading::from_bearing(180.0), Heading::S);
        assert_eq!(Heading::from_bearing(350.0), Heading::N);
        assert_eq!(Heading::from_bearing(-90.0), Heading::W);
    }
}
