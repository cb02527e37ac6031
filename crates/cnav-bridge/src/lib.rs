//! courtnav bridge
//!
//! Messaging between the native host and the embedded map surface.
//! - Inbound: JSON messages posted by the content, decoded into [`BridgeMessage`]
//! - Outbound: whole-content pushes, deferred until the surface has loaded

mod channel;
mod host;
mod message;
mod surface;

pub use channel::{bridge_channel, BridgeReceiver, BridgeSender};
pub use host::{HostBridge, PushStats};
pub use message::{BridgeMessage, DecodeError, COURT_MARKER_CLICK};
pub use surface::{Surface, SurfaceError, SurfaceState};
