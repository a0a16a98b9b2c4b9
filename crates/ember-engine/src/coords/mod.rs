//! Geometry shared between the window backend, the renderer and layers.
//!
//! Sizes are framebuffer pixels, origin top-left.

mod viewport;

pub use viewport::Viewport;
