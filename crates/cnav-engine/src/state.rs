//! Navigation state
//!
//! Browse, then a directions session per destination. Results of async work
//! carry the [`SessionToken`] of the session that started them; anything
//! tagged with an older token is discarded.

use std::fmt;

use cnav_geo::{Coordinate, Court, LocationError, UserPosition};
use cnav_map::NavigationMode;
use cnav_net::Route;

/// Identity of one directions session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of the position step of a directions session
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionsPhase {
    /// Position known; the route follows once resolved
    Ready {
        position: UserPosition,
        route: Option<Route>,
    },
    /// Position could not be acquired
    Error(LocationError),
}

/// Map screen state
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    Browse,
    RequestingPosition {
        destination: Court,
    },
    Directions {
        destination: Court,
        phase: DirectionsPhase,
    },
}

impl NavState {
    pub fn mode(&self) -> NavigationMode {
        match self {
            NavState::Browse => NavigationMode::Browse,
            _ => NavigationMode::Directions,
        }
    }

    pub fn destination(&self) -> Option<&Court> {
        match self {
            NavState::Browse => None,
            NavState::RequestingPosition { destination } | NavState::Directions { destination, .. } => {
                Some(destination)
            }
        }
    }

    pub fn position(&self) -> Option<&UserPosition> {
        match self {
            NavState::Directions {
                phase: DirectionsPhase::Ready { position, .. },
                ..
            } => Some(position),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            NavState::Directions {
                phase: DirectionsPhase::Ready { route, .. },
                ..
            } => route.as_ref(),
            _ => None,
        }
    }

    pub fn location_error(&self) -> Option<&LocationError> {
        match self {
            NavState::Directions {
                phase: DirectionsPhase::Error(err),
                ..
            } => Some(err),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            NavState::Browse => "browse",
            NavState::RequestingPosition { .. } => "requesting-position",
            NavState::Directions {
                phase: DirectionsPhase::Ready { .. },
                ..
            } => "directions-ready",
            NavState::Directions {
                phase: DirectionsPhase::Error(_),
                ..
            } => "directions-error",
        }
    }
}

/// Handle of a started directions session
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsTicket {
    pub token: SessionToken,
    pub destination: Court,
}

/// Route to compute for a session whose position is known
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub token: SessionToken,
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// What the machine made of a position result
#[derive(Debug, Clone, PartialEq)]
pub enum PositionResolution {
    /// Position applied; compute this route next
    Route(RouteRequest),
    /// Session moved to its error phase
    Failed(LocationError),
    /// Result belonged to a closed or superseded session
    Stale,
}
