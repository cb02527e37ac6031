//! Stdout surface
//!
//! Prints each pushed frame as the Leaflet script a real surface would run.

use cnav_engine::bridge::{Surface, SurfaceError};
use cnav_engine::map::{LeafletAdapter, MapContent};

pub struct StdoutSurface {
    adapter: LeafletAdapter,
    frames: usize,
}

impl StdoutSurface {
    pub fn new(adapter: LeafletAdapter) -> Self {
        Self { adapter, frames: 0 }
    }
}

impl Surface for StdoutSurface {
    type Content = MapContent;

    fn render(&mut self, content: &MapContent) -> Result<(), SurfaceError> {
        let script = self
            .adapter
            .script(content)
            .map_err(|e| SurfaceError::Render(e.to_string()))?;

        self.frames += 1;
        println!(
            "--- frame {} ({:?}, {} elements) ---",
            self.frames,
            content.mode,
            content.element_count()
        );
        println!("{script}");
        Ok(())
    }
}
