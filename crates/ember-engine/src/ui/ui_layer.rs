use crate::events::{Event, EventCategory};
use crate::layer::{Layer, LayerCtx};

use super::UiOverlay;

/// Always-on-top UI overlay pushed by the application at startup.
///
/// With `block_events` on, the overlay swallows mouse events while the UI
/// wants the mouse and keyboard events while it wants the keyboard, so
/// layers underneath never see input aimed at a panel.
#[derive(Debug)]
pub struct UiLayer {
    block_events: bool,
    want_capture_mouse: bool,
    want_capture_keyboard: bool,

    in_frame: bool,
    frames: u64,
}

impl UiLayer {
    pub fn new() -> Self {
        Self {
            block_events: true,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            in_frame: false,
            frames: 0,
        }
    }

    pub fn block_events(&self) -> bool {
        self.block_events
    }

    pub fn wants_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    pub fn wants_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    /// Completed begin/end brackets.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }
}

impl Default for UiLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for UiLayer {
    fn name(&self) -> &str {
        "UiLayer"
    }

    fn on_attach(&mut self) {
        log::debug!("UI overlay ready");
    }

    fn on_detach(&mut self) {
        log::debug!("UI overlay released after {} frames", self.frames);
    }

    fn on_event(&mut self, _ctx: &mut LayerCtx<'_>, event: &mut Event) {
        if !self.block_events {
            return;
        }

        let captured = (self.want_capture_mouse && event.is_in_category(EventCategory::MOUSE))
            || (self.want_capture_keyboard && event.is_in_category(EventCategory::KEYBOARD));
        event.merge_handled(captured);
    }

    fn as_ui_overlay(&mut self) -> Option<&mut dyn UiOverlay> {
        Some(self)
    }
}

impl UiOverlay for UiLayer {
    fn begin(&mut self) {
        assert!(!self.in_frame, "UI frame begun twice without end");
        self.in_frame = true;
    }

    fn end(&mut self) {
        assert!(self.in_frame, "UI frame ended without begin");
        self.in_frame = false;
        self.frames += 1;
        log::trace!("UI frame {} composed", self.frames);
    }

    fn set_block_events(&mut self, block: bool) {
        self.block_events = block;
    }

    fn set_want_capture_mouse(&mut self, want: bool) {
        if want != self.want_capture_mouse {
            log::debug!("UI mouse capture {}", if want { "on" } else { "off" });
        }
        self.want_capture_mouse = want;
    }

    fn set_want_capture_keyboard(&mut self, want: bool) {
        if want != self.want_capture_keyboard {
            log::debug!("UI keyboard capture {}", if want { "on" } else { "off" });
        }
        self.want_capture_keyboard = want;
    }
}
