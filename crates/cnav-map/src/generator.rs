//! Map content generator
//!
//! Pure function of its input: the same input always yields an equal
//! descriptor, and nothing from a previous frame leaks into the next.

use cnav_bridge::BridgeMessage;
use cnav_geo::{Bounds, Court, UserPosition};
use cnav_net::Route;

use crate::{Callout, Camera, Halo, MapContent, MapStyle, Marker, MarkerKind, NavigationMode, Padding, Polyline};

/// Marker id of the user position
pub const USER_MARKER_ID: &str = "user";

/// Marker id of the directions destination
pub const DESTINATION_MARKER_ID: &str = "destination";

/// Marker id of a court in browse mode
pub fn court_marker_id(court: &Court) -> String {
    format!("court:{}", court.id)
}

/// Everything a frame depends on
#[derive(Debug, Clone, Copy)]
pub struct MapInput<'a> {
    pub mode: NavigationMode,
    pub courts: &'a [Court],
    pub destination: Option<&'a Court>,
    pub user: Option<&'a UserPosition>,
    pub route: Option<&'a Route>,
}

impl<'a> MapInput<'a> {
    pub fn browse(courts: &'a [Court]) -> Self {
        Self {
            mode: NavigationMode::Browse,
            courts,
            destination: None,
            user: None,
            route: None,
        }
    }

    pub fn directions(
        destination: &'a Court,
        user: Option<&'a UserPosition>,
        route: Option<&'a Route>,
    ) -> Self {
        Self {
            mode: NavigationMode::Directions,
            courts: &[],
            destination: Some(destination),
            user,
            route,
        }
    }
}

/// Builds [`MapContent`] frames
#[derive(Debug, Clone, Default)]
pub struct MapContentGenerator {
    style: MapStyle,
}

impl MapContentGenerator {
    pub fn new(style: MapStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    /// Generate the complete frame for `input`
    pub fn generate(&self, input: &MapInput<'_>) -> MapContent {
        match (input.mode, input.destination) {
            (NavigationMode::Directions, Some(destination)) => {
                self.directions(destination, input.user, input.route)
            }
            (NavigationMode::Directions, None) => {
                tracing::warn!("Directions frame requested without a destination, showing courts");
                self.browse(input.courts)
            }
            (NavigationMode::Browse, _) => self.browse(input.courts),
        }
    }

    fn browse(&self, courts: &[Court]) -> MapContent {
        let mut markers = Vec::with_capacity(courts.len());
        let mut callouts = Vec::with_capacity(courts.len());

        for court in courts {
            if !court.coordinate.is_valid() {
                tracing::warn!("Skipping court {} with invalid coordinate {}", court.id, court.coordinate);
                continue;
            }

            let id = court_marker_id(court);
            callouts.push(Callout {
                marker_id: id.clone(),
                title: court.name.clone(),
                subtitle: court.location.clone(),
                rating: Some(court.rating),
            });
            markers.push(Marker {
                id,
                kind: MarkerKind::Court,
                position: court.coordinate,
                title: court.name.clone(),
                color: self.style.court_color.clone(),
                halo: None,
                on_click: Some(BridgeMessage::CourtMarkerClick { court: court.clone() }),
            });
        }

        let camera = match Bounds::from_points(markers.iter().map(|m| m.position)) {
            Some(bounds) if bounds.is_point() => Camera::Center {
                center: bounds.center(),
                zoom: self.style.focus_zoom,
            },
            Some(bounds) => Camera::Fit {
                bounds,
                padding: Padding::uniform(self.style.browse_padding),
                max_zoom: self.style.max_fit_zoom,
            },
            None => Camera::Center {
                center: self.style.default_center,
                zoom: self.style.default_zoom,
            },
        };

        MapContent {
            mode: NavigationMode::Browse,
            markers,
            polyline: None,
            camera,
            callouts,
        }
    }

    fn directions(
        &self,
        destination: &Court,
        user: Option<&UserPosition>,
        route: Option<&Route>,
    ) -> MapContent {
        let destination_marker = Marker {
            id: DESTINATION_MARKER_ID.to_string(),
            kind: MarkerKind::Destination,
            position: destination.coordinate,
            title: destination.name.clone(),
            color: self.style.destination_color.clone(),
            halo: None,
            on_click: None,
        };
        let callouts = vec![Callout {
            marker_id: DESTINATION_MARKER_ID.to_string(),
            title: destination.name.clone(),
            subtitle: destination.location.clone(),
            rating: Some(destination.rating),
        }];

        // Still waiting on (or failed to get) a position: destination only
        let Some(user) = user else {
            return MapContent {
                mode: NavigationMode::Directions,
                markers: vec![destination_marker],
                polyline: None,
                camera: Camera::Center {
                    center: destination.coordinate,
                    zoom: self.style.focus_zoom,
                },
                callouts,
            };
        };

        let user_marker = Marker {
            id: USER_MARKER_ID.to_string(),
            kind: MarkerKind::User,
            position: user.coordinate,
            title: "You are here".to_string(),
            color: self.style.user_color.clone(),
            halo: Some(Halo {
                radius_meters: user.accuracy_meters,
                color: self.style.user_color.clone(),
                opacity: self.style.halo_opacity,
            }),
            on_click: None,
        };

        let polyline = route.filter(|r| r.geometry.len() >= 2).map(|r| Polyline {
            points: r.geometry.clone(),
            color: self.style.route_color.clone(),
            weight: self.style.route_weight,
            dashed: r.is_approximate,
        });

        let mut bounds = Bounds::from_point(user.coordinate);
        bounds.extend(destination.coordinate);
        let camera = if bounds.is_point() {
            Camera::Center {
                center: destination.coordinate,
                zoom: self.style.focus_zoom,
            }
        } else {
            Camera::Fit {
                bounds,
                padding: self.style.directions_padding,
                max_zoom: self.style.max_fit_zoom,
            }
        };

        MapContent {
            mode: NavigationMode::Directions,
            markers: vec![user_marker, destination_marker],
            polyline,
            camera,
            callouts,
        }
    }
}
