use crate::coords::Viewport;
use crate::events::{CustomEvent, Event};
use crate::input::{Input, Key, MouseButton};
use crate::time::Timestep;
use crate::ui::{UiCaptureRequest, UiOverlay};

/// Per-callback view of the application handed to layer hooks.
///
/// A layer cannot borrow the application while the stack is being iterated,
/// so the few things a layer may touch live here.
pub struct LayerCtx<'a> {
    input: &'a dyn Input,
    viewport: Viewport,
    running: &'a mut bool,
    ui: UiCaptureRequest,
}

impl<'a> LayerCtx<'a> {
    pub fn new(input: &'a dyn Input, viewport: Viewport, running: &'a mut bool) -> Self {
        Self {
            input,
            viewport,
            running,
            ui: UiCaptureRequest::default(),
        }
    }

    /// Requests the run loop to stop. The current iteration still completes.
    pub fn close(&mut self) {
        *self.running = false;
    }

    pub fn is_running(&self) -> bool {
        *self.running
    }

    pub fn input(&self) -> &dyn Input {
        self.input
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.input.is_key_pressed(key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.input.is_mouse_button_pressed(button)
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.input.mouse_position()
    }

    /// Current framebuffer size; zero-sized while minimized.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Asks the UI overlay to swallow (or pass through) input it captures.
    /// Applied once the current pass over the stack is finished.
    pub fn block_ui_events(&mut self, block: bool) {
        self.ui.block_events = Some(block);
    }

    /// Asks the UI overlay to capture mouse events, e.g. while the cursor is
    /// over a panel. Applied once the current pass is finished.
    pub fn set_ui_want_capture_mouse(&mut self, want: bool) {
        self.ui.want_capture_mouse = Some(want);
    }

    pub fn set_ui_want_capture_keyboard(&mut self, want: bool) {
        self.ui.want_capture_keyboard = Some(want);
    }

    pub(crate) fn into_ui_request(self) -> UiCaptureRequest {
        self.ui
    }
}

/// A self-contained per-frame behavior unit composed by the layer stack.
///
/// Only `name` is required; every hook defaults to a no-op.
///
/// Lifecycle:
/// - `on_attach` runs exactly once, when the layer is pushed
/// - `on_detach` runs exactly once, when the layer is popped or the stack is
///   torn down
pub trait Layer {
    fn name(&self) -> &str;

    fn on_attach(&mut self) {}

    fn on_detach(&mut self) {}

    /// Per-frame simulation step. Skipped while the window is minimized.
    fn on_update(&mut self, ctx: &mut LayerCtx<'_>, ts: Timestep) {
        let _ = (ctx, ts);
    }

    /// Per-frame UI composition, always inside the overlay's begin/end
    /// bracket. Skipped while the window is minimized.
    fn on_ui_render(&mut self, ctx: &mut LayerCtx<'_>) {
        let _ = ctx;
    }

    /// Synchronous event delivery. Mark the event handled to stop it from
    /// reaching layers below this one.
    fn on_event(&mut self, ctx: &mut LayerCtx<'_>, event: &mut Event) {
        let _ = (ctx, event);
    }

    fn on_custom_event(&mut self, ctx: &mut LayerCtx<'_>, event: &mut CustomEvent) {
        let _ = (ctx, event);
    }

    /// Layers that bracket UI frames return themselves here.
    fn as_ui_overlay(&mut self) -> Option<&mut dyn UiOverlay> {
        None
    }
}
