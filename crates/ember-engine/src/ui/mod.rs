//! UI overlay.
//!
//! The application brackets every UI frame with [`UiOverlay::begin`] and
//! [`UiOverlay::end`]; all `Layer::on_ui_render` calls happen in between.
//!
//! Layers cannot reach the overlay while the stack is being walked, so they
//! file a [`UiCaptureRequest`] through their `LayerCtx` instead. The
//! application applies it to the overlay once the pass is over.

mod ui_layer;

pub use ui_layer::UiLayer;

/// Frame-bracketing and input-capture contract of the always-on-top UI
/// overlay.
pub trait UiOverlay {
    fn begin(&mut self);

    fn end(&mut self);

    /// Whether captured input is marked handled at the overlay.
    fn set_block_events(&mut self, block: bool) {
        let _ = block;
    }

    fn set_want_capture_mouse(&mut self, want: bool) {
        let _ = want;
    }

    fn set_want_capture_keyboard(&mut self, want: bool) {
        let _ = want;
    }
}

/// Capture switches requested by layers during one pass over the stack.
///
/// `None` leaves the overlay's current setting alone; the last request wins.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct UiCaptureRequest {
    pub block_events: Option<bool>,
    pub want_capture_mouse: Option<bool>,
    pub want_capture_keyboard: Option<bool>,
}

impl UiCaptureRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, ui: &mut dyn UiOverlay) {
        if let Some(block) = self.block_events {
            ui.set_block_events(block);
        }
        if let Some(want) = self.want_capture_mouse {
            ui.set_want_capture_mouse(want);
        }
        if let Some(want) = self.want_capture_keyboard {
            ui.set_want_capture_keyboard(want);
        }
    }
}
