//! Navigation state machine
//!
//! Owns the court list, the current [`NavState`] and the surface (through its
//! [`HostBridge`]). Every transition regenerates the complete map content and
//! pushes it; the bridge holds it back until the surface has loaded.
//!
//! The machine itself never awaits. Async results are fed back through
//! [`NavigationStateMachine::position_resolved`] and
//! [`NavigationStateMachine::route_resolved`] with the session token they
//! were started under.

use cnav_bridge::{BridgeMessage, DecodeError, HostBridge, Surface, SurfaceError};
use cnav_geo::{Court, LocationError, UserPosition};
use cnav_map::{MapContent, MapContentGenerator, MapInput, MapStyle, NavigationMode};
use cnav_net::{Route, RouteSummary};

use crate::state::{
    DirectionsPhase, DirectionsTicket, NavState, PositionResolution, RouteRequest, SessionToken,
};
use crate::ConfigError;

/// Misuse of the navigation API
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("unknown court: {0}")]
    UnknownCourt(String),

    #[error("no directions session is open")]
    NotInDirections,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error the map screen shows to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserFacingError {
    #[error("Location permission is needed to show directions.")]
    PermissionDenied,

    #[error("Couldn't get your current location ({0}).")]
    PositionUnavailable(String),

    #[error("The map couldn't be loaded ({0}).")]
    SurfaceLoad(String),
}

impl From<&LocationError> for UserFacingError {
    fn from(err: &LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => UserFacingError::PermissionDenied,
            LocationError::PositionUnavailable(reason) => {
                UserFacingError::PositionUnavailable(reason.clone())
            }
        }
    }
}

/// Map screen state machine
pub struct NavigationStateMachine<S: Surface<Content = MapContent>> {
    courts: Vec<Court>,
    state: NavState,
    token: SessionToken,
    selected: Option<Court>,
    generator: MapContentGenerator,
    bridge: HostBridge<S>,
    content: MapContent,
}

impl<S: Surface<Content = MapContent>> NavigationStateMachine<S> {
    /// Start in browse mode over `courts`
    pub fn new(surface: S, style: MapStyle, courts: Vec<Court>) -> Self {
        let courts = usable_courts(courts);
        let generator = MapContentGenerator::new(style);
        let content = generator.generate(&MapInput::browse(&courts));
        let mut bridge = HostBridge::new(surface);
        bridge.push(content.clone());

        Self {
            courts,
            state: NavState::Browse,
            token: SessionToken::default(),
            selected: None,
            generator,
            bridge,
            content,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn mode(&self) -> NavigationMode {
        self.state.mode()
    }

    pub fn session_token(&self) -> SessionToken {
        self.token
    }

    pub fn courts(&self) -> &[Court] {
        &self.courts
    }

    /// Last generated content
    pub fn content(&self) -> &MapContent {
        &self.content
    }

    pub fn bridge(&self) -> &HostBridge<S> {
        &self.bridge
    }

    pub fn destination(&self) -> Option<&Court> {
        self.state.destination()
    }

    pub fn user_position(&self) -> Option<&UserPosition> {
        self.state.position()
    }

    pub fn route(&self) -> Option<&Route> {
        self.state.route()
    }

    /// Route info panel, once the route is known
    pub fn route_summary(&self) -> Option<RouteSummary> {
        self.state.route().map(RouteSummary::new)
    }

    /// Court shown in the floating detail view
    pub fn selected_court(&self) -> Option<&Court> {
        self.selected.as_ref()
    }

    /// Error to show, if any. A map that failed to load wins over a location error.
    pub fn user_error(&self) -> Option<UserFacingError> {
        if let Some(SurfaceError::LoadFailed(reason)) = self.bridge.load_error() {
            return Some(UserFacingError::SurfaceLoad(reason));
        }
        self.state.location_error().map(UserFacingError::from)
    }

    /// Start a directions session to `court_id`, superseding any open one
    pub fn request_directions(&mut self, court_id: &str) -> Result<DirectionsTicket, NavError> {
        let destination = self
            .courts
            .iter()
            .find(|c| c.id == court_id)
            .cloned()
            .ok_or_else(|| NavError::UnknownCourt(court_id.to_string()))?;

        Ok(self.begin_session(destination))
    }

    /// Request the position again for the open session's destination
    pub fn retry(&mut self) -> Result<DirectionsTicket, NavError> {
        let destination = self.state.destination().cloned().ok_or(NavError::NotInDirections)?;
        Ok(self.begin_session(destination))
    }

    /// Apply the position outcome of session `token`
    pub fn position_resolved(
        &mut self,
        token: SessionToken,
        outcome: Result<UserPosition, LocationError>,
    ) -> PositionResolution {
        let destination = match &self.state {
            NavState::RequestingPosition { destination } if token == self.token => destination.clone(),
            _ => {
                tracing::debug!(
                    "Discarding position result of session {} (current {}, {})",
                    token,
                    self.token,
                    self.state.name()
                );
                return PositionResolution::Stale;
            }
        };

        let resolution = match outcome {
            Ok(position) => {
                let request = RouteRequest {
                    token,
                    origin: position.coordinate,
                    destination: destination.coordinate,
                };
                self.state = NavState::Directions {
                    destination,
                    phase: DirectionsPhase::Ready { position, route: None },
                };
                PositionResolution::Route(request)
            }
            Err(err) => {
                tracing::warn!("Directions to {} unavailable: {}", destination.id, err);
                self.state = NavState::Directions {
                    destination,
                    phase: DirectionsPhase::Error(err.clone()),
                };
                PositionResolution::Failed(err)
            }
        };

        tracing::info!("Session {} -> {}", token, self.state.name());
        self.refresh();
        resolution
    }

    /// Apply the route of session `token`. Returns `false` if it was stale.
    pub fn route_resolved(&mut self, token: SessionToken, resolved: Route) -> bool {
        if token != self.token {
            tracing::debug!("Discarding route of session {} (current {})", token, self.token);
            return false;
        }

        let NavState::Directions {
            phase: DirectionsPhase::Ready { route, .. },
            ..
        } = &mut self.state
        else {
            tracing::debug!("Discarding route in state {}", self.state.name());
            return false;
        };

        tracing::info!(
            "Session {} route: {:.0} m{}",
            token,
            resolved.distance_meters,
            if resolved.is_approximate { " (approximate)" } else { "" }
        );
        *route = Some(resolved);
        self.refresh();
        true
    }

    /// Leave directions mode. Returns `false` if already browsing.
    pub fn close_directions(&mut self) -> bool {
        if self.state == NavState::Browse {
            return false;
        }

        self.token = self.token.next();
        self.state = NavState::Browse;
        tracing::info!("Directions closed, session now {}", self.token);
        self.refresh();
        true
    }

    /// Open the detail view for a court. Only browse mode has one.
    pub fn select_marker(&mut self, court_id: &str) -> Result<bool, NavError> {
        let court = self
            .courts
            .iter()
            .find(|c| c.id == court_id)
            .cloned()
            .ok_or_else(|| NavError::UnknownCourt(court_id.to_string()))?;

        Ok(self.open_detail(court))
    }

    /// Close the detail view. Returns `false` if none was open.
    pub fn dismiss_detail(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Handle a raw message posted by the surface.
    ///
    /// Undecodable messages are returned as errors and change nothing.
    pub fn handle_bridge_message(&mut self, raw: &str) -> Result<BridgeMessage, DecodeError> {
        let message = self.bridge.on_message(raw)?;

        match &message {
            BridgeMessage::CourtMarkerClick { court } => {
                self.open_detail(court.clone());
            }
        }

        Ok(message)
    }

    /// Replace the court list
    pub fn set_courts(&mut self, courts: Vec<Court>) {
        let courts = usable_courts(courts);
        tracing::debug!("Court list replaced ({} courts)", courts.len());
        self.courts = courts;

        let courts = &self.courts;
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| !courts.iter().any(|c| c.id == selected.id))
        {
            self.selected = None;
        }

        // A running session keeps its destination snapshot
        if self.state == NavState::Browse {
            self.refresh();
        }
    }

    /// Surface finished loading. Shows the latest content.
    pub fn surface_loaded(&mut self) {
        let had_pending = self.bridge.has_pending();
        self.bridge.surface_loaded();
        if !had_pending {
            self.bridge.push(self.content.clone());
        }
    }

    /// Surface failed to load
    pub fn surface_failed(&mut self, reason: &str) -> SurfaceError {
        self.bridge.surface_failed(reason)
    }

    fn begin_session(&mut self, destination: Court) -> DirectionsTicket {
        self.token = self.token.next();
        self.selected = None;
        tracing::info!(
            "Session {}: directions to {} ({})",
            self.token,
            destination.id,
            destination.name
        );

        self.state = NavState::RequestingPosition {
            destination: destination.clone(),
        };
        self.refresh();

        DirectionsTicket {
            token: self.token,
            destination,
        }
    }

    fn open_detail(&mut self, court: Court) -> bool {
        if self.state != NavState::Browse {
            tracing::debug!("Ignoring court selection in {}", self.state.name());
            return false;
        }
        self.selected = Some(court);
        true
    }

    fn refresh(&mut self) {
        let input = match &self.state {
            NavState::Browse => MapInput::browse(&self.courts),
            NavState::RequestingPosition { destination } => {
                MapInput::directions(destination, None, None)
            }
            NavState::Directions { destination, phase } => match phase {
                DirectionsPhase::Ready { position, route } => {
                    MapInput::directions(destination, Some(position), route.as_ref())
                }
                DirectionsPhase::Error(_) => MapInput::directions(destination, None, None),
            },
        };

        let content = self.generator.generate(&input);
        self.content = content.clone();
        self.bridge.push(content);
    }
}

/// Drop courts that cannot be placed on the map or routed to
fn usable_courts(courts: Vec<Court>) -> Vec<Court> {
    courts
        .into_iter()
        .filter(|court| match court.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Skipping court {}: {}", court.id, err);
                false
            }
        })
        .collect()
}
