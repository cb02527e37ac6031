//! OSRM route API
//!
//! Request URL construction and response decoding for
//! `GET /route/v1/{profile}/{lng},{lat};{lng},{lat}?overview=full&geometries=geojson`.

use cnav_geo::Coordinate;
use serde::Deserialize;
use url::Url;

use crate::{Route, RoutingConfig, RoutingError};

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Build the route request URL for an origin/destination pair
pub fn route_url(
    config: &RoutingConfig,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<Url, RoutingError> {
    let mut base = Url::parse(&config.base_url).map_err(|e| RoutingError::InvalidUrl(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(RoutingError::InvalidUrl(config.base_url.clone()));
    }

    // Keep any path prefix on the base when joining
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let path = format!(
        "route/v1/{}/{},{};{},{}",
        config.profile, origin.lng, origin.lat, destination.lng, destination.lat
    );
    let mut url = base.join(&path).map_err(|e| RoutingError::InvalidUrl(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("overview", "full")
        .append_pair("geometries", "geojson");

    Ok(url)
}

/// Decode a route response body into a road-following [`Route`]
pub fn decode_route(body: &[u8]) -> Result<Route, RoutingError> {
    let response: OsrmResponse = serde_json::from_slice(body)?;

    if response.code != "Ok" {
        return Err(RoutingError::NoRoute {
            code: response.code,
            message: response.message,
        });
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRoute {
            code: response.code,
            message: Some("response contains no routes".to_string()),
        });
    };

    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::from_lng_lat)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RoutingError::Decode(e.to_string()))?;

    if geometry.len() < 2 {
        return Err(RoutingError::Decode(format!(
            "route geometry has {} point(s)",
            geometry.len()
        )));
    }
    if !(route.distance.is_finite() && route.distance >= 0.0) {
        return Err(RoutingError::Decode(format!("invalid distance: {}", route.distance)));
    }
    if !(route.duration.is_finite() && route.duration >= 0.0) {
        return Err(RoutingError::Decode(format!("invalid duration: {}", route.duration)));
    }

    Ok(Route {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry,
        is_approximate: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new_unchecked(10.30, 123.89)
    }

    fn destination() -> Coordinate {
        Coordinate::new_unchecked(10.31, 123.90)
    }

    #[test]
    fn test_route_url() {
        let url = route_url(&RoutingConfig::default(), origin(), destination()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://router.project-osrm.org/route/v1/driving/123.89,10.3;123.9,10.31?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn test_route_url_keeps_prefix() {
        let config = RoutingConfig::default().with_base_url("http://localhost:5000/osrm");
        let url = route_url(&config, origin(), destination()).unwrap();
        assert_eq!(url.path(), "/osrm/route/v1/driving/123.89,10.3;123.9,10.31");
    }

    #[test]
    fn test_route_url_invalid_base() {
        let config = RoutingConfig::default().with_base_url("not a url");
        assert!(matches!(
            route_url(&config, origin(), destination()),
            Err(RoutingError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_decode_ok() {
        let body = br#"{
            "code": "Ok",
            "routes": [{
                "distance": 2034.5,
                "duration": 301.2,
                "geometry": {"type": "LineString", "coordinates": [[123.89, 10.30], [123.895, 10.305], [123.90, 10.31]]}
            }],
            "waypoints": []
        }"#;
        let route = decode_route(body).unwrap();
        assert!(!route.is_approximate);
        assert_eq!(route.distance_meters, 2034.5);
        assert_eq!(route.duration_seconds, 301.2);
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[0], origin());
        assert_eq!(route.geometry[2], destination());
    }

    #[test]
    fn test_decode_no_route() {
        let body = br#"{"code": "NoRoute", "message": "Impossible route between points", "routes": []}"#;
        match decode_route(body) {
            Err(RoutingError::NoRoute { code, message }) => {
                assert_eq!(code, "NoRoute");
                assert!(message.is_some());
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unusable() {
        assert!(decode_route(b"<html>502</html>").is_err());
        assert!(decode_route(br#"{"code": "Ok", "routes": []}"#).is_err());
        assert!(decode_route(
            br#"{"code":"Ok","routes":[{"distance":1,"duration":1,"geometry":{"coordinates":[[123.9,10.3]]}}]}"#
        )
        .is_err());
        // Latitude slot holds 123.9: pairs in the wrong order
        assert!(decode_route(
            br#"{"code":"Ok","routes":[{"distance":1,"duration":1,"geometry":{"coordinates":[[10.3,123.9],[10.31,123.9]]}}]}"#
        )
        .is_err());
    }
}
