use anyhow::{Result, ensure};

use crate::coords::Viewport;

use super::Renderer;

/// Renderer front-end that tracks the active viewport.
///
/// Surface reconfiguration happens in the window backend; this type keeps the
/// logical viewport used to build projections and guards init/shutdown
/// pairing.
#[derive(Debug, Default)]
pub struct ViewportRenderer {
    viewport: Viewport,
    initialized: bool,
}

impl ViewportRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::from_size(width, height),
            initialized: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Renderer for ViewportRenderer {
    fn init(&mut self) -> Result<()> {
        ensure!(!self.initialized, "renderer initialized twice");
        self.initialized = true;
        log::info!(
            "renderer initialized ({}x{})",
            self.viewport.width,
            self.viewport.height
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;
        log::info!("renderer shut down");
    }

    fn on_window_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::from_size(width, height);
        log::debug!("viewport set to {width}x{height}");
    }
}
