//! courtnav routing
//!
//! Road routes from an OSRM-compatible HTTP service. Whenever the service
//! can't produce one, a straight great-circle segment is returned instead, so
//! callers always get something to draw.

mod config;
mod osrm;
mod route;
mod service;
mod transport;
pub mod format;

pub use config::{RoutingConfig, DEFAULT_FALLBACK_SPEED_KMH, DEFAULT_PROFILE, DEFAULT_ROUTING_URL};
pub use format::{format_distance, format_duration, RouteSummary};
pub use osrm::{decode_route, route_url};
pub use route::{estimate_minutes, Route};
pub use service::RouteService;
pub use transport::{HttpTransport, RouteTransport, TransportResponse};
pub use url::Url;

use std::time::Duration;

/// Routing failure. Never escapes [`RouteService::route`].
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("routing request timed out after {0:?}")]
    Timeout(Duration),

    #[error("no route: {code}")]
    NoRoute { code: String, message: Option<String> },

    #[error("invalid routing response: {0}")]
    Decode(String),

    #[error("invalid routing URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for RoutingError {
    fn from(err: serde_json::Error) -> Self {
        RoutingError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RoutingError::Transport(format!("timed out: {err}"))
        } else if let Some(status) = err.status() {
            RoutingError::Status(status.as_u16())
        } else {
            RoutingError::Transport(err.to_string())
        }
    }
}
