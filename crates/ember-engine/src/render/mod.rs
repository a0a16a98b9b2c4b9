//! Renderer collaborator.
//!
//! Draw batching and GPU resources live behind the window backend; the
//! application only needs process-wide init/shutdown and resize notification.

mod viewport_renderer;

pub use viewport_renderer::ViewportRenderer;

use anyhow::Result;

pub trait Renderer {
    /// Called once, while the application is constructed.
    fn init(&mut self) -> Result<()>;

    /// Called once, after every layer has been detached.
    fn shutdown(&mut self);

    /// New framebuffer size. Never called with a zero dimension.
    fn on_window_resize(&mut self, width: u32, height: u32);
}
