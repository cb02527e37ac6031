//! Route presentation
//!
//! Human-readable distance and duration text for the route info panel.

use cnav_geo::{initial_bearing, Heading};
use serde::Serialize;

use crate::Route;

/// `"850 m"` below one kilometer, `"1.6 km"` above
pub fn format_distance(meters: f64) -> String {
    let meters = meters.max(0.0);
    let rounded = meters.round();
    if rounded < 1000.0 {
        format!("{} m", rounded as u64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// `"45 min"` below one hour, `"3 h 39 min"` above
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds.max(0.0) / 60.0).round() as u64;
    if minutes < 60 {
        return format!("{minutes} min");
    }

    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest == 0 {
        format!("{hours} h")
    } else {
        format!("{hours} h {rest} min")
    }
}

/// Route info panel contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
    pub is_approximate: bool,
    pub bearing_degrees: f64,
    pub heading: Heading,
}

impl RouteSummary {
    pub fn new(route: &Route) -> Self {
        let bearing_degrees = match (route.origin(), route.destination()) {
            (Some(from), Some(to)) => initial_bearing(from, to),
            _ => 0.0,
        };

        Self {
            distance_text: format_distance(route.distance_meters),
            duration_text: format_duration(route.duration_seconds),
            is_approximate: route.is_approximate,
            bearing_degrees,
            heading: Heading::from_bearing(bearing_degrees),
        }
    }
}
