//! Map styling configuration

use cnav_geo::Coordinate;
use serde::{Deserialize, Serialize};

use crate::Padding;

/// Colours, sizes and camera defaults for generated content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub court_color: String,
    pub user_color: String,
    pub destination_color: String,
    pub route_color: String,
    pub route_weight: f64,
    /// Opacity of the user accuracy halo
    pub halo_opacity: f64,
    /// Padding when fitting every court in browse mode
    pub browse_padding: f64,
    /// Padding when fitting a route; the bottom leaves room for the route panel
    pub directions_padding: Padding,
    /// Camera centre when there is nothing to fit
    pub default_center: Coordinate,
    pub default_zoom: u8,
    /// Zoom when focusing a single point
    pub focus_zoom: u8,
    pub max_fit_zoom: u8,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            court_color: "#16a34a".to_string(),
            user_color: "#2563eb".to_string(),
            destination_color: "#dc2626".to_string(),
            route_color: "#2563eb".to_string(),
            route_weight: 5.0,
            halo_opacity: 0.15,
            browse_padding: 48.0,
            directions_padding: Padding {
                top: 60.0,
                right: 40.0,
                bottom: 220.0,
                left: 40.0,
            },
            default_center: Coordinate::new_unchecked(10.3157, 123.8854),
            default_zoom: 12,
            focus_zoom: 15,
            max_fit_zoom: 17,
        }
    }
}
