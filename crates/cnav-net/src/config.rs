//! Routing configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public OSRM demo server
pub const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org";

/// OSRM profile segment of the route path
pub const DEFAULT_PROFILE: &str = "driving";

/// Average travel speed assumed by the great-circle estimate.
///
/// A business constant, not a measured value.
pub const DEFAULT_FALLBACK_SPEED_KMH: f64 = 30.0;

/// Routing service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Service root, e.g. `https://router.project-osrm.org`
    pub base_url: String,

    /// OSRM profile (`driving`, `cycling`, `foot`)
    pub profile: String,

    /// Whole-request deadline
    pub timeout_ms: u64,

    /// Speed used to estimate fallback durations
    pub fallback_speed_kmh: f64,

    /// User agent sent with routing requests
    pub user_agent: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTING_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout_ms: 10_000,
            fallback_speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
            user_agent: format!("courtnav/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RoutingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_fallback_speed(mut self, speed_kmh: f64) -> Self {
        self.fallback_speed_kmh = speed_kmh;
        self
    }
}
