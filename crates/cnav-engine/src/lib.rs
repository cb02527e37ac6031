//! courtnav Engine
//!
//! Location-aware navigation for the court map screen.
//!
//! # Overview
//! - Browse mode shows every court; tapping one opens its detail view
//! - Directions mode acquires the user's position, then a road route (or a
//!   great-circle estimate when the routing service is unavailable)
//! - Map content is pushed as complete frames to the embedded surface
//!
//! # Example
//! ```rust,ignore
//! use cnav_engine::{NavConfig, NavigationStateMachine, Navigator};
//!
//! let config = NavConfig::default();
//! let machine = NavigationStateMachine::new(surface, config.map.clone(), courts);
//! let navigator = Navigator::new(machine, positions, routes);
//! let session = navigator.request_directions("c1")?;
//! executor.spawn(session).detach();
//! ```

mod config;
mod machine;
mod navigator;
mod state;

pub use config::{
    ConfigError, NavConfig, ENV_FALLBACK_SPEED_KMH, ENV_FIX_TIMEOUT_SECS, ENV_ROUTING_PROFILE,
    ENV_ROUTING_TIMEOUT_SECS, ENV_ROUTING_URL,
};
pub use machine::{NavError, NavigationStateMachine, UserFacingError};
pub use navigator::{Navigator, SessionOutcome};
pub use state::{
    DirectionsPhase, DirectionsTicket, NavState, PositionResolution, RouteRequest, SessionToken,
};

pub use cnav_bridge as bridge;
pub use cnav_geo as geo;
pub use cnav_map as map;
pub use cnav_net as net;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
