//! courtnav Shell - Main Entry Point
//!
//! `cnav-shell [courts.json] [court-id] [lat,lng]`
//!
//! Renders the browse map, taps a court marker, then asks for directions to
//! it from a fixed position. Frames are printed as surface scripts.

mod device;
mod surface;

use std::path::Path;

use anyhow::{Context, Result};
use cnav_engine::bridge::bridge_channel;
use cnav_engine::geo::{Coordinate, Court, PositionProvider};
use cnav_engine::map::{LeafletAdapter, MarkerKind};
use cnav_engine::net::{HttpTransport, RouteService};
use cnav_engine::{NavConfig, NavigationStateMachine, Navigator, SessionOutcome};
use smol::LocalExecutor;
use tracing_subscriber::EnvFilter;

use device::{AutoGrant, FixedLocator};
use surface::StdoutSurface;

const SAMPLE_COURTS: &str = include_str!("../courts.sample.json");

/// Accuracy reported by the fixed locator
const SHELL_ACCURACY_METERS: f64 = 20.0;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting courtnav shell {}", cnav_engine::VERSION);

    let mut args = std::env::args().skip(1);
    let courts = match args.next() {
        Some(path) => load_courts(Path::new(&path))?,
        None => parse_courts(SAMPLE_COURTS).context("built-in sample courts")?,
    };
    let court_id = args.next();
    let position = args
        .next()
        .map(|arg| arg.parse::<Coordinate>().with_context(|| format!("invalid position {arg:?}")))
        .transpose()?;

    let config = load_config()?;
    let position = position.unwrap_or(config.map.default_center);

    let adapter = LeafletAdapter::default();
    let document = adapter.document(&config.map)?;
    tracing::info!("Surface document ready ({} bytes)", document.len());

    let transport = HttpTransport::new(&config.routing).context("failed to build HTTP client")?;
    let machine = NavigationStateMachine::new(StdoutSurface::new(adapter), config.map.clone(), courts);
    let navigator = Navigator::new(
        machine,
        PositionProvider::new(
            AutoGrant,
            FixedLocator::new(position, SHELL_ACCURACY_METERS),
            config.position.clone(),
        ),
        RouteService::new(transport, config.routing.clone()),
    );

    let ex = LocalExecutor::new();
    smol::block_on(ex.run(run(&ex, &navigator, court_id.as_deref())))
}

type ShellNavigator = Navigator<StdoutSurface, AutoGrant, FixedLocator, HttpTransport>;

async fn run(ex: &LocalExecutor<'_>, navigator: &ShellNavigator, court_id: Option<&str>) -> Result<()> {
    let (content_side, host_side) = bridge_channel();
    let pump = ex.spawn(navigator.message_pump(host_side));

    navigator.with_machine(|machine| machine.surface_loaded());

    // Tap the requested court's marker (or the first one) the way the page would
    let click = {
        let machine = navigator.machine();
        let mut markers = machine.content().markers_of(MarkerKind::Court);
        let marker = match court_id {
            Some(id) => markers.find(|m| m.id == format!("court:{id}")),
            None => markers.next(),
        };
        marker.and_then(|m| m.on_click.clone())
    };
    let Some(click) = click else {
        anyhow::bail!("no court marker to tap");
    };
    // Drain the tap through the pump before reading the selection
    content_side.post_message(click.encode()?);
    drop(content_side);
    pump.await;

    let selected = navigator
        .machine()
        .selected_court()
        .cloned()
        .context("marker tap did not select a court")?;
    println!("Selected {} ({}) - rating {:.1}", selected.name, selected.location, selected.rating);

    let session = ex.spawn(navigator.request_directions(&selected.id)?);
    match session.await {
        SessionOutcome::Routed => {
            if let Some(summary) = navigator.machine().route_summary() {
                println!(
                    "Route to {}: {}, {} heading {}{}",
                    selected.name,
                    summary.distance_text,
                    summary.duration_text,
                    summary.heading.as_str(),
                    if summary.is_approximate { " (straight-line estimate)" } else { "" }
                );
            }
        }
        SessionOutcome::Failed(err) => println!("Directions unavailable: {err}"),
        SessionOutcome::Stale => {}
    }
    if let Some(err) = navigator.machine().user_error() {
        println!("{err}");
    }

    navigator.close_directions();

    let stats = navigator.machine().bridge().stats();
    tracing::info!("Done: {} frames rendered, {} deferred", stats.rendered, stats.deferred);
    Ok(())
}

fn load_config() -> Result<NavConfig> {
    let mut config = match std::env::var_os("CNAV_CONFIG") {
        Some(path) => NavConfig::load(&path)?,
        None => NavConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn load_courts(path: &Path) -> Result<Vec<Court>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read courts from {}", path.display()))?;
    parse_courts(&json).with_context(|| format!("invalid courts file {}", path.display()))
}

fn parse_courts(json: &str) -> Result<Vec<Court>> {
    let courts: Vec<Court> = serde_json::from_str(json)?;
    for court in &courts {
        court
            .validate()
            .with_context(|| format!("court {}", court.id))?;
    }
    Ok(courts)
}
