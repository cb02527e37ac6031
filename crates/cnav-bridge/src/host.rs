//! Host side of the bridge
//!
//! Owns the surface handle. Content pushed before the surface has loaded is
//! kept (latest only) and flushed on the ready signal.

use crate::{BridgeMessage, DecodeError, Surface, SurfaceError, SurfaceState};

/// Push statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushStats {
    /// Content handed to the surface
    pub rendered: u64,
    /// Pushes held back until the surface loads
    pub deferred: u64,
    /// Deferred pushes replaced by a newer one
    pub superseded: u64,
    /// Renders the surface rejected
    pub failed: u64,
}

/// Native end of the host/content bridge
pub struct HostBridge<S: Surface> {
    surface: S,
    state: SurfaceState,
    pending: Option<S::Content>,
    stats: PushStats,
}

impl<S: Surface> HostBridge<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: SurfaceState::Loading,
            pending: None,
            stats: PushStats::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn stats(&self) -> PushStats {
        self.stats
    }

    /// User-facing load error, if the surface failed to load
    pub fn load_error(&self) -> Option<SurfaceError> {
        match &self.state {
            SurfaceState::Failed(reason) => Some(SurfaceError::LoadFailed(reason.clone())),
            _ => None,
        }
    }

    /// Replace the surface content, or hold it until the surface is ready
    pub fn push(&mut self, content: S::Content) {
        if self.is_ready() {
            self.render(content);
            return;
        }

        self.stats.deferred += 1;
        if self.pending.replace(content).is_some() {
            self.stats.superseded += 1;
        }
        tracing::debug!("Surface not ready ({:?}), deferring content push", self.state);
    }

    /// Surface finished its initial load; flush deferred content
    pub fn surface_loaded(&mut self) {
        tracing::info!("Map surface ready");
        self.state = SurfaceState::Ready;
        if let Some(content) = self.pending.take() {
            self.render(content);
        }
    }

    /// Surface failed its initial load. Not retried automatically.
    pub fn surface_failed(&mut self, reason: &str) -> SurfaceError {
        tracing::warn!("Map surface failed to load: {}", reason);
        self.state = SurfaceState::Failed(reason.to_string());
        SurfaceError::LoadFailed(reason.to_string())
    }

    /// Decode an inbound message; failures are logged and returned
    pub fn on_message(&self, raw: &str) -> Result<BridgeMessage, DecodeError> {
        BridgeMessage::decode(raw).inspect_err(|err| {
            tracing::warn!("Dropping bridge message: {}", err);
        })
    }

    fn render(&mut self, content: S::Content) {
        match self.surface.render(&content) {
            Ok(()) => self.stats.rendered += 1,
            Err(err) => {
                self.stats.failed += 1;
                tracing::warn!("{}", err);
            }
        }
    }
}
