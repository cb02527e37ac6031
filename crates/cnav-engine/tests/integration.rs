//! Integration tests - Full directions sessions
//!
//! Tests the complete workflow: permission → fix → route → map content,
//! with fake device seams, routing transports and surfaces.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use cnav_engine::bridge::{bridge_channel, BridgeMessage, Surface, SurfaceError};
use cnav_engine::geo::{
    haversine_km, Coordinate, Court, Fix, FixOptions, LocationError, Locator, PermissionPrompt,
    PermissionState, PositionProvider, SensorError,
};
use cnav_engine::map::{MapContent, MapStyle, NavigationMode, DESTINATION_MARKER_ID, USER_MARKER_ID};
use cnav_engine::net::{
    estimate_minutes, RouteService, RouteTransport, RoutingConfig, RoutingError, TransportResponse, Url,
};
use cnav_engine::{
    DirectionsPhase, NavState, NavigationStateMachine, Navigator, SessionOutcome, UserFacingError,
};
use smol::channel::{self, Receiver};
use smol::future;
use smol::LocalExecutor;

// ============================================================================
// FAKES
// ============================================================================

#[derive(Clone)]
struct SharedSurface {
    frames: Rc<RefCell<Vec<MapContent>>>,
}

impl Surface for SharedSurface {
    type Content = MapContent;

    fn render(&mut self, content: &MapContent) -> Result<(), SurfaceError> {
        self.frames.borrow_mut().push(content.clone());
        Ok(())
    }
}

struct Prompt {
    answer: Rc<Cell<PermissionState>>,
    calls: Rc<Cell<u32>>,
}

impl PermissionPrompt for Prompt {
    async fn request_foreground(&self) -> PermissionState {
        self.calls.set(self.calls.get() + 1);
        self.answer.get()
    }
}

/// Holds the permission answer until the test sends one
struct GatedPrompt {
    answers: Receiver<PermissionState>,
    calls: Rc<Cell<u32>>,
}

impl PermissionPrompt for GatedPrompt {
    async fn request_foreground(&self) -> PermissionState {
        self.calls.set(self.calls.get() + 1);
        self.answers.recv().await.unwrap_or(PermissionState::Denied)
    }
}

struct FixedLocator(Fix);

impl Locator for FixedLocator {
    async fn current_fix(&self, _options: &FixOptions) -> Result<Fix, SensorError> {
        Ok(self.0)
    }
}

/// Waits for the test to hand it a fix
struct GatedLocator {
    fixes: Receiver<Fix>,
}

impl Locator for GatedLocator {
    async fn current_fix(&self, _options: &FixOptions) -> Result<Fix, SensorError> {
        self.fixes.recv().await.map_err(|_| SensorError::Disabled)
    }
}

struct HangingTransport;

impl RouteTransport for HangingTransport {
    async fn get(&self, _url: &Url) -> Result<TransportResponse, RoutingError> {
        future::pending().await
    }
}

struct OfflineTransport;

impl RouteTransport for OfflineTransport {
    async fn get(&self, _url: &Url) -> Result<TransportResponse, RoutingError> {
        Err(RoutingError::Transport("network unreachable".into()))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn court(id: &str, lat: f64, lng: f64) -> Court {
    Court {
        id: id.into(),
        name: format!("Court {id}"),
        coordinate: Coordinate::new(lat, lng).unwrap(),
        location: "Cebu City".into(),
        rating: 4.6,
        image_url: format!("https://img.example.com/{id}.jpg"),
        phone_number: Some("+63 32 000 0000".into()),
    }
}

fn courts() -> Vec<Court> {
    vec![court("c1", 10.31, 123.90), court("c2", 10.35, 123.95)]
}

const USER_FIX: Fix = Fix {
    latitude: 10.30,
    longitude: 123.89,
    accuracy: 18.0,
};

struct Harness {
    frames: Rc<RefCell<Vec<MapContent>>>,
    permission: Rc<Cell<PermissionState>>,
    prompts: Rc<Cell<u32>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(Vec::new())),
            permission: Rc::new(Cell::new(PermissionState::Granted)),
            prompts: Rc::new(Cell::new(0)),
        }
    }

    fn navigator<L: Locator + 'static, T: RouteTransport + 'static>(
        &self,
        locator: L,
        transport: T,
        routing: RoutingConfig,
    ) -> Navigator<SharedSurface, Prompt, L, T> {
        let surface = SharedSurface {
            frames: Rc::clone(&self.frames),
        };
        let mut machine = NavigationStateMachine::new(surface, MapStyle::default(), courts());
        machine.surface_loaded();

        let prompt = Prompt {
            answer: Rc::clone(&self.permission),
            calls: Rc::clone(&self.prompts),
        };
        Navigator::new(
            machine,
            PositionProvider::new(prompt, locator, FixOptions::default()),
            RouteService::new(transport, routing),
        )
    }
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_routing_timeout_scenario() {
    let harness = Harness::new();
    let routing = RoutingConfig::default().with_timeout(Duration::from_millis(50));
    let navigator = harness.navigator(FixedLocator(USER_FIX), HangingTransport, routing);

    let ex = LocalExecutor::new();
    let task = ex.spawn(navigator.request_directions("c1").unwrap());
    assert_eq!(smol::block_on(ex.run(task)), SessionOutcome::Routed);

    let machine = navigator.machine();
    assert!(matches!(
        machine.state(),
        NavState::Directions {
            phase: DirectionsPhase::Ready { .. },
            ..
        }
    ));

    let user = Coordinate::new(10.30, 123.89).unwrap();
    let destination = Coordinate::new(10.31, 123.90).unwrap();
    let route = machine.route().unwrap();
    assert!(route.is_approximate);
    assert_eq!(route.geometry, vec![user, destination]);

    let km = haversine_km(user, destination);
    assert!((route.distance_km() - km).abs() < 1e-9);
    assert_eq!(route.duration_seconds, estimate_minutes(km, 30.0) * 60.0);

    let content = machine.content();
    assert_eq!(content.mode, NavigationMode::Directions);
    assert_eq!(content.element_count(), 3);
    assert!(content.polyline.as_ref().unwrap().dashed);
    assert_eq!(harness.frames.borrow().last(), Some(content));

    let summary = machine.route_summary().unwrap();
    assert!(summary.is_approximate);
    assert!(summary.distance_text.ends_with(" km"));
}

#[test]
fn test_close_while_position_pending() {
    let harness = Harness::new();
    let (fixes, rx) = channel::unbounded();
    let navigator = harness.navigator(
        GatedLocator { fixes: rx },
        OfflineTransport,
        RoutingConfig::default(),
    );

    smol::block_on(async {
        let mut first = navigator.request_directions("c1").unwrap();
        assert!(future::poll_once(&mut first).await.is_none());

        assert!(navigator.close_directions());
        let mut second = navigator.request_directions("c2").unwrap();
        assert!(future::poll_once(&mut second).await.is_none());

        // The reopened session shares the pending acquisition
        assert_eq!(harness.prompts.get(), 1);

        fixes.send(USER_FIX).await.unwrap();

        assert_eq!(first.await, SessionOutcome::Stale);
        assert!(matches!(
            navigator.machine().state(),
            NavState::RequestingPosition { destination } if destination.id == "c2"
        ));

        assert_eq!(second.await, SessionOutcome::Routed);
    });

    let machine = navigator.machine();
    assert_eq!(machine.destination().map(|c| c.id.as_str()), Some("c2"));
    let route = machine.route().unwrap();
    assert_eq!(route.destination(), Some(Coordinate::new(10.35, 123.95).unwrap()));
}

#[test]
fn test_repeat_request_joins_pending_prompt() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let calls = Rc::new(Cell::new(0));
    let (answers, rx) = channel::unbounded();

    let mut machine = NavigationStateMachine::new(
        SharedSurface { frames: Rc::clone(&frames) },
        MapStyle::default(),
        courts(),
    );
    machine.surface_loaded();
    let prompt = GatedPrompt {
        answers: rx,
        calls: Rc::clone(&calls),
    };
    let navigator = Navigator::new(
        machine,
        PositionProvider::new(prompt, FixedLocator(USER_FIX), FixOptions::default()),
        RouteService::new(OfflineTransport, RoutingConfig::default()),
    );

    smol::block_on(async {
        let mut first = navigator.request_directions("c1").unwrap();
        assert!(future::poll_once(&mut first).await.is_none());
        let mut second = navigator.request_directions("c1").unwrap();
        assert!(future::poll_once(&mut second).await.is_none());

        // One dialog for both sessions
        assert_eq!(calls.get(), 1);

        answers.send(PermissionState::Granted).await.unwrap();
        assert_eq!(first.await, SessionOutcome::Stale);
        assert_eq!(second.await, SessionOutcome::Routed);
    });

    assert_eq!(calls.get(), 1);
    let machine = navigator.machine();
    assert_eq!(machine.destination().map(|c| c.id.as_str()), Some("c1"));
    assert!(machine.route().unwrap().is_approximate);
    assert!(machine.user_error().is_none());
}

#[test]
fn test_close_while_route_pending() {
    let harness = Harness::new();
    let routing = RoutingConfig::default().with_timeout(Duration::from_millis(50));
    let navigator = harness.navigator(FixedLocator(USER_FIX), HangingTransport, routing);

    smol::block_on(async {
        let mut session = navigator.request_directions("c1").unwrap();
        assert!(future::poll_once(&mut session).await.is_none());
        assert!(navigator.machine().user_position().is_some());

        assert!(navigator.close_directions());
        assert_eq!(session.await, SessionOutcome::Stale);
    });

    let machine = navigator.machine();
    assert_eq!(machine.mode(), NavigationMode::Browse);
    assert!(machine.route().is_none());
    assert_eq!(machine.content().markers.len(), 2);
}

#[test]
fn test_permission_denied_then_retry() {
    let harness = Harness::new();
    harness.permission.set(PermissionState::Denied);
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());

    let outcome = smol::block_on(navigator.request_directions("c1").unwrap());
    assert_eq!(outcome, SessionOutcome::Failed(LocationError::PermissionDenied));
    {
        let machine = navigator.machine();
        assert_eq!(machine.state().name(), "directions-error");
        assert_eq!(machine.user_error(), Some(UserFacingError::PermissionDenied));
        assert!(machine.content().marker(DESTINATION_MARKER_ID).is_some());
        assert!(machine.content().marker(USER_MARKER_ID).is_none());
        assert!(machine.route().is_none());
    }

    harness.permission.set(PermissionState::Granted);
    let outcome = smol::block_on(navigator.retry().unwrap());
    assert_eq!(outcome, SessionOutcome::Routed);
    assert_eq!(harness.prompts.get(), 2);

    let machine = navigator.machine();
    assert!(machine.user_error().is_none());
    assert!(machine.route().unwrap().is_approximate);
}

#[test]
fn test_retry_outside_directions() {
    let harness = Harness::new();
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());
    assert!(navigator.retry().is_err());
    assert!(navigator.request_directions("missing").is_err());
    assert_eq!(navigator.machine().mode(), NavigationMode::Browse);
}

// ============================================================================
// BRIDGE TESTS
// ============================================================================

#[test]
fn test_message_pump_skips_malformed() {
    let harness = Harness::new();
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());
    let (sender, receiver) = bridge_channel();

    let clicked = courts()[1].clone();
    sender.post_message("{oops");
    sender.post_message(r#"{"type":"courtMarkerClick","court":{"id":"c1"}}"#);
    sender.post_message(r#"{"type":"unknownThing"}"#);
    sender.post_message(BridgeMessage::CourtMarkerClick { court: clicked.clone() }.encode().unwrap());
    drop(sender);

    smol::block_on(navigator.message_pump(receiver));

    let machine = navigator.machine();
    assert_eq!(machine.mode(), NavigationMode::Browse);
    assert_eq!(machine.selected_court(), Some(&clicked));
}

#[test]
fn test_spawned_pump_applies_tap_before_join() {
    let harness = Harness::new();
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());
    let (sender, receiver) = bridge_channel();

    let ex = LocalExecutor::new();
    let pump = ex.spawn(navigator.message_pump(receiver));

    let tapped = courts()[0].clone();
    sender.post_message(BridgeMessage::CourtMarkerClick { court: tapped.clone() }.encode().unwrap());
    drop(sender);
    smol::block_on(ex.run(pump));

    assert_eq!(navigator.machine().selected_court(), Some(&tapped));
}

#[test]
fn test_malformed_message_in_directions() {
    let harness = Harness::new();
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());
    smol::block_on(navigator.request_directions("c1").unwrap());

    let before = navigator.machine().state().clone();
    let frames = harness.frames.borrow().len();

    let (sender, receiver) = bridge_channel();
    sender.post_message("not json at all");
    sender.post_message(r#"{"type":"courtMarkerClick","court":{"id":"x","name":"x","coordinate":{"lat":123.9,"lng":10.3},"location":"","rating":1,"imageUrl":""}}"#);
    drop(sender);
    smol::block_on(navigator.message_pump(receiver));

    assert_eq!(navigator.machine().state(), &before);
    assert_eq!(harness.frames.borrow().len(), frames);
    assert!(navigator.machine().selected_court().is_none());
}

// ============================================================================
// CONTENT TESTS
// ============================================================================

#[test]
fn test_regeneration_idempotent() {
    let harness = Harness::new();
    let navigator = harness.navigator(FixedLocator(USER_FIX), OfflineTransport, RoutingConfig::default());

    let before = navigator.machine().content().clone();
    navigator.with_machine(|machine| machine.set_courts(courts()));
    assert_eq!(navigator.machine().content(), &before);

    smol::block_on(navigator.request_directions("c2").unwrap());
    let directions = navigator.machine().content().clone();
    assert!(navigator.close_directions());
    assert_eq!(navigator.machine().content(), &before);
    assert_ne!(directions, before);

    let frames = harness.frames.borrow();
    assert_eq!(frames.first(), Some(&before));
    assert_eq!(frames.last(), Some(&before));
}

#[test]
fn test_pushes_wait_for_surface() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let surface = SharedSurface {
        frames: Rc::clone(&frames),
    };
    let mut machine = NavigationStateMachine::new(surface, MapStyle::default(), courts());
    machine.request_directions("c1").unwrap();
    machine.close_directions();
    assert!(frames.borrow().is_empty());

    machine.surface_loaded();
    assert_eq!(frames.borrow().len(), 1);
    assert_eq!(frames.borrow()[0].mode, NavigationMode::Browse);
    assert_eq!(machine.bridge().stats().superseded, 2);
}
