//! Async navigation driver
//!
//! Runs directions sessions on a single-threaded executor: position first,
//! then the route, each result fed back into the state machine under the
//! session token it was started with. A session started while a position
//! acquisition is pending joins it rather than prompting again; the result
//! of the superseded session is discarded by its token. No `RefCell` borrow
//! is held across an await point.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use cnav_bridge::{BridgeReceiver, Surface};
use cnav_geo::{LocationError, Locator, PermissionPrompt, PositionProvider};
use cnav_map::MapContent;
use cnav_net::{RouteService, RouteTransport};
use smol::future::{BoxedLocal, FutureExt};

use crate::machine::{NavError, NavigationStateMachine};
use crate::state::{PositionResolution, SessionToken};

/// How a directions session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Position and route applied
    Routed,
    /// Position unavailable; the session shows its error
    Failed(LocationError),
    /// Session was closed or superseded before finishing
    Stale,
}

/// Drives the state machine with the position provider and route service
pub struct Navigator<S, P, L, T>
where
    S: Surface<Content = MapContent>,
{
    machine: Rc<RefCell<NavigationStateMachine<S>>>,
    positions: Rc<PositionProvider<P, L>>,
    routes: Rc<RouteService<T>>,
}

impl<S, P, L, T> Navigator<S, P, L, T>
where
    S: Surface<Content = MapContent> + 'static,
    P: PermissionPrompt + 'static,
    L: Locator + 'static,
    T: RouteTransport + 'static,
{
    pub fn new(
        machine: NavigationStateMachine<S>,
        positions: PositionProvider<P, L>,
        routes: RouteService<T>,
    ) -> Self {
        Self {
            machine: Rc::new(RefCell::new(machine)),
            positions: Rc::new(positions),
            routes: Rc::new(routes),
        }
    }

    /// Read access to the state machine
    pub fn machine(&self) -> Ref<'_, NavigationStateMachine<S>> {
        self.machine.borrow()
    }

    /// Run a synchronous operation on the state machine
    pub fn with_machine<R>(&self, f: impl FnOnce(&mut NavigationStateMachine<S>) -> R) -> R {
        f(&mut self.machine.borrow_mut())
    }

    /// Start directions to `court_id`.
    ///
    /// The returned future runs the session; spawn it on a `LocalExecutor`
    /// or await it.
    pub fn request_directions(&self, court_id: &str) -> Result<BoxedLocal<SessionOutcome>, NavError> {
        let ticket = self.machine.borrow_mut().request_directions(court_id)?;
        Ok(self.session(ticket.token))
    }

    /// Ask for the position again after an error
    pub fn retry(&self) -> Result<BoxedLocal<SessionOutcome>, NavError> {
        let ticket = self.machine.borrow_mut().retry()?;
        Ok(self.session(ticket.token))
    }

    /// Close the directions session; its pending work becomes stale
    pub fn close_directions(&self) -> bool {
        self.machine.borrow_mut().close_directions()
    }

    /// Feed messages posted by the surface into the machine until the
    /// content side goes away
    pub fn message_pump(&self, receiver: BridgeReceiver) -> BoxedLocal<()> {
        let machine = Rc::clone(&self.machine);

        async move {
            while let Some(raw) = receiver.recv_raw().await {
                if let Ok(message) = machine.borrow_mut().handle_bridge_message(&raw) {
                    tracing::debug!("Handled {} message", message.tag());
                }
            }
            tracing::debug!("Bridge closed");
        }
        .boxed_local()
    }

    fn session(&self, token: SessionToken) -> BoxedLocal<SessionOutcome> {
        let machine = Rc::clone(&self.machine);
        let positions = Rc::clone(&self.positions);
        let routes = Rc::clone(&self.routes);

        async move {
            let outcome = positions.acquire().await;
            let resolution = machine.borrow_mut().position_resolved(token, outcome);

            let request = match resolution {
                PositionResolution::Route(request) => request,
                PositionResolution::Failed(err) => return SessionOutcome::Failed(err),
                PositionResolution::Stale => return SessionOutcome::Stale,
            };

            let route = routes.route(request.origin, request.destination).await;
            if machine.borrow_mut().route_resolved(request.token, route) {
                SessionOutcome::Routed
            } else {
                SessionOutcome::Stale
            }
        }
        .boxed_local()
    }
}
