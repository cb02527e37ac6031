//! Route service
//!
//! Road route first, great-circle estimate on any failure.

use cnav_geo::Coordinate;
use smol::future::FutureExt;
use smol::Timer;

use crate::osrm::{decode_route, route_url};
use crate::{Route, RouteTransport, RoutingConfig, RoutingError, TransportResponse};

/// Computes travel routes; never fails
pub struct RouteService<T> {
    transport: T,
    config: RoutingConfig,
}

impl<T: RouteTransport> RouteService<T> {
    pub fn new(transport: T, config: RoutingConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Route from `origin` to `destination`.
    ///
    /// Routing errors are logged and resolved into the great-circle fallback.
    pub async fn route(&self, origin: Coordinate, destination: Coordinate) -> Route {
        match self.fetch(origin, destination).await {
            Ok(route) => {
                tracing::info!(
                    "Road route resolved: {:.0} m, {:.0} s, {} points",
                    route.distance_meters,
                    route.duration_seconds,
                    route.geometry.len()
                );
                route
            }
            Err(err) => {
                tracing::warn!("Routing service unavailable ({}), using great-circle estimate", err);
                self.fallback(origin, destination)
            }
        }
    }

    /// Great-circle estimate at the configured fallback speed
    pub fn fallback(&self, origin: Coordinate, destination: Coordinate) -> Route {
        Route::great_circle(origin, destination, self.config.fallback_speed_kmh)
    }

    /// Ask the routing service only, surfacing its error
    pub async fn fetch(&self, origin: Coordinate, destination: Coordinate) -> Result<Route, RoutingError> {
        let url = route_url(&self.config, origin, destination)?;
        let timeout = self.config.timeout();

        let response = self
            .transport
            .get(&url)
            .or(async {
                Timer::after(timeout).await;
                Err::<TransportResponse, _>(RoutingError::Timeout(timeout))
            })
            .await?;

        if !response.ok() {
            // OSRM reports NoRoute/InvalidQuery with a 400 and a JSON body
            return match decode_route(&response.body) {
                Err(err @ RoutingError::NoRoute { .. }) => Err(err),
                _ => Err(RoutingError::Status(response.status)),
            };
        }

        decode_route(&response.body)
    }
}
