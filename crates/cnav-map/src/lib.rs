//! courtnav map content
//!
//! Builds the declarative description of what the embedded map shows
//! (markers, route polyline, camera, callouts) and translates it into script
//! for the Leaflet page hosted in the surface.
//!
//! # Example
//! ```rust,ignore
//! let generator = MapContentGenerator::new(MapStyle::default());
//! let content = generator.generate(&MapInput::browse(&courts));
//! let script = LeafletAdapter::default().script(&content)?;
//! ```

mod content;
mod generator;
mod leaflet;
mod style;

pub use content::{Callout, Camera, Halo, MapContent, Marker, MarkerKind, NavigationMode, Padding, Polyline};
pub use generator::{court_marker_id, MapContentGenerator, MapInput, DESTINATION_MARKER_ID, USER_MARKER_ID};
pub use leaflet::{LeafletAdapter, DEFAULT_BRIDGE_OBJECT};
pub use style::MapStyle;
