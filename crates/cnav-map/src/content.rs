//! Map content descriptor
//!
//! Plain data describing one complete frame of the map. Every push carries a
//! whole descriptor; the surface replaces what it shows.

use cnav_bridge::BridgeMessage;
use cnav_geo::{Bounds, Coordinate};
use serde::{Deserialize, Serialize};

/// Map screen mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationMode {
    /// Every court as a marker
    Browse,
    /// One destination, the user and the route
    Directions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    Court,
    User,
    Destination,
}

/// Translucent circle drawn around a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Halo {
    pub radius_meters: f64,
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: String,
    pub color: String,
    pub halo: Option<Halo>,
    /// Message the content posts back when the marker is tapped
    pub on_click: Option<BridgeMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub points: Vec<Coordinate>,
    pub color: String,
    pub weight: f64,
    pub dashed: bool,
}

/// Edge padding in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Camera placement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Camera {
    Center {
        center: Coordinate,
        zoom: u8,
    },
    #[serde(rename_all = "camelCase")]
    Fit {
        bounds: Bounds,
        padding: Padding,
        max_zoom: u8,
    },
}

/// Info bubble attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Callout {
    pub marker_id: String,
    pub title: String,
    pub subtitle: String,
    pub rating: Option<f64>,
}

/// One complete frame of map content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapContent {
    pub mode: NavigationMode,
    pub markers: Vec<Marker>,
    pub polyline: Option<Polyline>,
    pub camera: Camera,
    pub callouts: Vec<Callout>,
}

impl MapContent {
    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    /// Markers plus the route line, if any
    pub fn element_count(&self) -> usize {
        self.markers.len() + usize::from(self.polyline.is_some())
    }
}
