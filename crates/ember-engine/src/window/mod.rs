//! Window collaborator.
//!
//! The application owns exactly one window. Once per frame it calls
//! [`Window::service`], which presents the frame and pumps platform events;
//! every platform event is translated and handed synchronously to the
//! [`EventSink`] before `service` returns.

mod translate;
mod winit_window;

pub use winit_window::WinitWindow;

use crate::events::Event;

/// Window construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowProps {
    pub title: String,
    /// Initial client size in logical pixels.
    pub width: u32,
    pub height: u32,
}

impl WindowProps {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }
}

impl Default for WindowProps {
    fn default() -> Self {
        Self::new("Ember Engine", 1280, 720)
    }
}

/// Receiver of translated platform events (the registered event callback).
pub trait EventSink {
    fn on_event(&mut self, event: Event);
}

/// Collects events instead of handling them.
impl EventSink for Vec<Event> {
    fn on_event(&mut self, event: Event) {
        self.push(event);
    }
}

pub trait Window {
    fn title(&self) -> &str;

    /// Current framebuffer width in physical pixels.
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Presents the current frame and pumps pending platform events into
    /// `sink`. May re-enter the application synchronously.
    fn service(&mut self, sink: &mut dyn EventSink);
}
