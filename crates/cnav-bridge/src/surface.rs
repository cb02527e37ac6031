//! Embedded rendering surface

/// Load state of the embedded surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    /// Initial document still loading
    Loading,
    /// Ready to accept content pushes
    Ready,
    /// Initial load failed
    Failed(String),
}

/// Surface error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("map failed to load: {0}")]
    LoadFailed(String),

    #[error("map render failed: {0}")]
    Render(String),
}

/// Renderer-specific sink for whole content descriptors
pub trait Surface {
    type Content;

    /// Replace everything the surface shows with `content`
    fn render(&mut self, content: &Self::Content) -> Result<(), SurfaceError>;
}
