//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The window
//! backend translates platform events into engine events; the input snapshot
//! is fed from those same events.

mod state;
mod types;

pub use state::InputState;
pub use types::{Key, Modifiers, MouseButton};

use crate::events::Event;

/// Input collaborator consumed by the application.
pub trait Input {
    /// Sees every event delivered to the application, before the layers do.
    fn observe(&mut self, event: &Event) {
        let _ = event;
    }

    /// Called once per frame after update/UI-render, before the window is
    /// serviced.
    fn refresh(&mut self);

    fn is_key_pressed(&self, key: Key) -> bool;

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;

    /// Pointer position in logical pixels, if the pointer is over the window.
    fn mouse_position(&self) -> Option<(f32, f32)>;
}
