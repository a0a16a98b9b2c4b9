use anyhow::{Context, Result};

use crate::coords::Viewport;
use crate::events::{CustomEvent, Event, EventDispatcher, WindowCloseEvent, WindowResizeEvent};
use crate::input::{Input, InputState};
use crate::layer::{Layer, LayerCtx, LayerId, LayerStack};
use crate::render::{Renderer, ViewportRenderer};
use crate::time::{FrameClock, FrameProfile, MonotonicClock, ProfileScope, TimeSource, Timestep};
use crate::ui::{UiCaptureRequest, UiLayer, UiOverlay};
use crate::window::{EventSink, WinitWindow, Window};

use super::config::AppConfig;
use super::instance::InstanceGuard;

/// Owns the run: window, collaborators, layer stack and run-state.
///
/// At most one is alive per process; constructing a second one panics.
///
/// Teardown order on drop: every layer is detached (reverse forward order),
/// then the renderer is shut down, then the window is destroyed.
pub struct Application {
    window: Box<dyn Window>,
    core: Core,
    time: Box<dyn TimeSource>,
    clock: FrameClock,
    profile: FrameProfile,

    // Last field: the slot is released only after everything else is gone.
    _instance: InstanceGuard,
}

/// Everything the window may re-enter while it is being serviced.
struct Core {
    layers: LayerStack,
    ui_overlay: LayerId,
    renderer: Box<dyn Renderer>,
    input: Box<dyn Input>,
    viewport: Viewport,
    running: bool,
    minimized: bool,
}

impl Application {
    /// Builds the application around a default [`UiLayer`] overlay.
    pub fn new(
        config: AppConfig,
        window: Box<dyn Window>,
        renderer: Box<dyn Renderer>,
        input: Box<dyn Input>,
    ) -> Result<Self> {
        Self::with_ui_overlay(config, window, renderer, input, Box::new(UiLayer::new()))
    }

    /// Like [`Application::new`] with a caller-supplied UI overlay. The
    /// overlay's `as_ui_overlay` provides the per-frame begin/end bracket.
    pub fn with_ui_overlay(
        config: AppConfig,
        window: Box<dyn Window>,
        mut renderer: Box<dyn Renderer>,
        input: Box<dyn Input>,
        ui_overlay: Box<dyn Layer>,
    ) -> Result<Self> {
        let instance = InstanceGuard::acquire();

        log::info!(
            "starting '{}' ({}x{})",
            window.title(),
            window.width(),
            window.height()
        );

        renderer.init().context("renderer initialization failed")?;

        let mut layers = LayerStack::new();
        let ui_overlay = layers.push_overlay(ui_overlay);

        let viewport = Viewport::from_size(window.width(), window.height());
        let minimized = !viewport.is_valid();

        Ok(Self {
            window,
            core: Core {
                layers,
                ui_overlay,
                renderer,
                input,
                viewport,
                running: true,
                minimized,
            },
            time: Box::new(MonotonicClock::new()),
            clock: FrameClock::new(config.max_timestep),
            profile: FrameProfile::default(),
            _instance: instance,
        })
    }

    /// Desktop setup: a winit window with a wgpu surface, a
    /// [`ViewportRenderer`] and an [`InputState`].
    pub fn with_winit(config: AppConfig) -> Result<Self> {
        let window = WinitWindow::new(config.window.clone(), config.gpu.clone())
            .context("failed to open the main window")?;
        let renderer = ViewportRenderer::new(window.width(), window.height());

        Self::new(
            config,
            Box::new(window),
            Box::new(renderer),
            Box::new(InputState::new()),
        )
    }

    /// Replaces the clock read at the top of every iteration. The next
    /// timestep is zero.
    pub fn set_time_source(&mut self, time: Box<dyn TimeSource>) {
        self.time = time;
        self.clock.reset();
    }

    pub fn push_layer<L: Layer + 'static>(&mut self, layer: L) -> LayerId {
        self.core.layers.push_layer(Box::new(layer))
    }

    pub fn push_overlay<L: Layer + 'static>(&mut self, overlay: L) -> LayerId {
        self.core.layers.push_overlay(Box::new(overlay))
    }

    /// Detaches and returns the layer; `None` if `id` is not in the layers
    /// region.
    pub fn pop_layer(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        self.core.layers.pop_layer(id)
    }

    /// Popping the UI overlay removes the UI bracket; UI-render hooks still
    /// run every frame.
    pub fn pop_overlay(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        self.core.layers.pop_overlay(id)
    }

    /// Requests the loop to stop after the current iteration.
    pub fn close(&mut self) {
        self.core.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.core.running
    }

    pub fn is_minimized(&self) -> bool {
        self.core.minimized
    }

    pub fn viewport(&self) -> Viewport {
        self.core.viewport
    }

    pub fn window(&self) -> &dyn Window {
        self.window.as_ref()
    }

    pub fn input(&self) -> &dyn Input {
        self.core.input.as_ref()
    }

    pub fn layers(&self) -> &LayerStack {
        &self.core.layers
    }

    pub fn ui_overlay_id(&self) -> LayerId {
        self.core.ui_overlay
    }

    pub fn ui_overlay_mut(&mut self) -> Option<&mut dyn UiOverlay> {
        self.core.ui_overlay_mut()
    }

    /// Phase timings of the most recent [`Application::run_frame`].
    pub fn last_frame_profile(&self) -> FrameProfile {
        self.profile
    }

    /// Delivers a platform event: built-in close/resize handling, then the
    /// layer stack in reverse order until a layer marks it handled.
    ///
    /// Returns whether the event ended up handled.
    pub fn on_event(&mut self, event: Event) -> bool {
        self.core.dispatch_event(event)
    }

    /// Delivers a custom event through the layer stack in reverse order.
    pub fn on_custom_event(&mut self, event: CustomEvent) -> bool {
        self.core.dispatch_custom_event(event)
    }

    /// One scheduler iteration: timestep, update and UI (unless minimized),
    /// input refresh, window service.
    pub fn run_frame(&mut self) {
        let mut profile = FrameProfile::default();
        {
            let _frame_scope = ProfileScope::new("RunLoop", &mut profile.total);

            let frame = self.clock.tick(self.time.now());
            log::trace!("frame {} ({})", frame.frame_index, frame.timestep);

            if !self.core.minimized {
                {
                    let _scope = ProfileScope::new("LayerStack update", &mut profile.update);
                    self.core.update(frame.timestep);
                }
                {
                    let _scope = ProfileScope::new("LayerStack UI render", &mut profile.ui_render);
                    self.core.render_ui();
                }
            }

            self.core.input.refresh();

            let _scope = ProfileScope::new("Window service", &mut profile.service);
            self.window.service(&mut self.core);
        }
        self.profile = profile;
    }

    /// Runs iterations until a close event or close request.
    pub fn run(&mut self) {
        log::info!("entering run loop");
        self.clock.reset();

        let mut frames = 0u64;
        while self.core.running {
            self.run_frame();
            frames += 1;
        }

        log::info!("run loop exited after {frames} frames");
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        self.core.layers.clear();
        self.core.renderer.shutdown();
        log::info!("application shut down");
    }
}

impl Core {
    fn ui_overlay_mut(&mut self) -> Option<&mut dyn UiOverlay> {
        self.layers
            .get_mut(self.ui_overlay)
            .and_then(|layer| layer.as_ui_overlay())
    }

    /// Hands capture switches filed by layers to the UI overlay.
    fn apply_ui_request(&mut self, request: UiCaptureRequest) {
        if request.is_empty() {
            return;
        }
        match self.ui_overlay_mut() {
            Some(ui) => request.apply_to(ui),
            None => log::debug!("UI capture request dropped: no UI overlay"),
        }
    }

    fn update(&mut self, ts: Timestep) {
        let mut ctx = LayerCtx::new(self.input.as_ref(), self.viewport, &mut self.running);
        for layer in self.layers.iter_mut() {
            layer.on_update(&mut ctx, ts);
        }

        let request = ctx.into_ui_request();
        self.apply_ui_request(request);
    }

    fn render_ui(&mut self) {
        if let Some(ui) = self.ui_overlay_mut() {
            ui.begin();
        }

        let mut ctx = LayerCtx::new(self.input.as_ref(), self.viewport, &mut self.running);
        for layer in self.layers.iter_mut() {
            layer.on_ui_render(&mut ctx);
        }
        let request = ctx.into_ui_request();

        if let Some(ui) = self.ui_overlay_mut() {
            ui.end();
        }
        self.apply_ui_request(request);
    }

    fn dispatch_event(&mut self, mut event: Event) -> bool {
        log::trace!("event: {event}");
        self.input.observe(&event);

        let mut dispatcher = EventDispatcher::new(&mut event);
        dispatcher.dispatch::<WindowCloseEvent, _>(|_| self.on_window_close());
        dispatcher.dispatch::<WindowResizeEvent, _>(|e| self.on_window_resize(e));

        let mut ctx = LayerCtx::new(self.input.as_ref(), self.viewport, &mut self.running);
        for layer in self.layers.iter_mut().rev() {
            if event.handled() {
                break;
            }
            layer.on_event(&mut ctx, &mut event);
        }

        let request = ctx.into_ui_request();
        self.apply_ui_request(request);
        event.handled()
    }

    fn dispatch_custom_event(&mut self, mut event: CustomEvent) -> bool {
        log::trace!("custom event: {event}");

        let mut ctx = LayerCtx::new(self.input.as_ref(), self.viewport, &mut self.running);
        for layer in self.layers.iter_mut().rev() {
            if event.handled() {
                break;
            }
            layer.on_custom_event(&mut ctx, &mut event);
        }

        let request = ctx.into_ui_request();
        self.apply_ui_request(request);
        event.handled()
    }

    fn on_window_close(&mut self) -> bool {
        log::info!("window close requested");
        self.running = false;
        true
    }

    fn on_window_resize(&mut self, e: &WindowResizeEvent) -> bool {
        self.viewport = Viewport::from_size(e.width, e.height);

        if e.is_zero_area() {
            if !self.minimized {
                log::debug!("window minimized");
            }
            self.minimized = true;
            return false;
        }

        if self.minimized {
            log::debug!("window restored ({}x{})", e.width, e.height);
        }
        self.minimized = false;
        self.renderer.on_window_resize(e.width, e.height);
        false
    }
}

impl EventSink for Core {
    fn on_event(&mut self, event: Event) {
        self.dispatch_event(event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::LazyLock;
    use std::time::Duration;

    use anyhow::bail;

    use super::*;
    use crate::core::application_exists;
    use crate::core::instance::serial;
    use crate::events::{CustomEventKind, CustomEventType, EventKind, KeyPressedEvent, MouseMovedEvent};
    use crate::input::{Key, MouseButton};

    type Log = Rc<RefCell<Vec<String>>>;
    type Batches = Rc<RefCell<VecDeque<Vec<Event>>>>;

    fn record(log: &Log, line: impl Into<String>) {
        log.borrow_mut().push(line.into());
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    // ── fakes ─────────────────────────────────────────────────────────────

    /// Hands one scripted batch of events to the sink per service call.
    struct ScriptedWindow {
        log: Log,
        batches: Batches,
    }

    impl Window for ScriptedWindow {
        fn title(&self) -> &str {
            "scripted"
        }

        fn width(&self) -> u32 {
            800
        }

        fn height(&self) -> u32 {
            600
        }

        fn service(&mut self, sink: &mut dyn EventSink) {
            record(&self.log, "service");
            let batch = self.batches.borrow_mut().pop_front().unwrap_or_default();
            for event in batch {
                sink.on_event(event);
            }
        }
    }

    struct RecordingRenderer {
        log: Log,
        fail_init: bool,
    }

    impl Renderer for RecordingRenderer {
        fn init(&mut self) -> Result<()> {
            if self.fail_init {
                bail!("no device");
            }
            record(&self.log, "renderer init");
            Ok(())
        }

        fn shutdown(&mut self) {
            record(&self.log, "renderer shutdown");
        }

        fn on_window_resize(&mut self, width: u32, height: u32) {
            record(&self.log, format!("renderer resize {width}x{height}"));
        }
    }

    struct RecordingInput {
        log: Log,
    }

    impl Input for RecordingInput {
        fn refresh(&mut self) {
            record(&self.log, "input refresh");
        }

        fn is_key_pressed(&self, _key: Key) -> bool {
            false
        }

        fn is_mouse_button_pressed(&self, _button: MouseButton) -> bool {
            false
        }

        fn mouse_position(&self) -> Option<(f32, f32)> {
            None
        }
    }

    /// Overlay that records its bracket calls.
    struct RecordingUi {
        log: Log,
    }

    impl Layer for RecordingUi {
        fn name(&self) -> &str {
            "ui"
        }

        fn as_ui_overlay(&mut self) -> Option<&mut dyn UiOverlay> {
            Some(self)
        }
    }

    impl UiOverlay for RecordingUi {
        fn begin(&mut self) {
            record(&self.log, "ui begin");
        }

        fn end(&mut self) {
            record(&self.log, "ui end");
        }
    }

    struct ScriptedClock(RefCell<VecDeque<f64>>);

    impl TimeSource for ScriptedClock {
        fn now(&self) -> f64 {
            let mut readings = self.0.borrow_mut();
            if readings.len() > 1 {
                readings.pop_front().unwrap_or_default()
            } else {
                readings.front().copied().unwrap_or_default()
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        name: &'static str,
        log: Log,
        consumes: Option<EventKind>,
        consumes_custom: bool,
        close_on_update: bool,
        capture_mouse_on_update: bool,
        busy_in_update: Option<Duration>,
        panic_in_ui: bool,
        steps: Rc<RefCell<Vec<f32>>>,
    }

    impl Layer for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_attach(&mut self) {
            record(&self.log, format!("attach {}", self.name));
        }

        fn on_detach(&mut self) {
            record(&self.log, format!("detach {}", self.name));
        }

        fn on_update(&mut self, ctx: &mut LayerCtx<'_>, ts: Timestep) {
            record(&self.log, format!("update {}", self.name));
            self.steps.borrow_mut().push(ts.seconds());
            if self.close_on_update {
                ctx.close();
            }
            if self.capture_mouse_on_update {
                ctx.set_ui_want_capture_mouse(true);
            }
            if let Some(busy) = self.busy_in_update {
                std::thread::sleep(busy);
            }
        }

        fn on_ui_render(&mut self, _ctx: &mut LayerCtx<'_>) {
            record(&self.log, format!("ui {}", self.name));
            if self.panic_in_ui {
                panic!("layer {} failed to render", self.name);
            }
        }

        fn on_event(&mut self, _ctx: &mut LayerCtx<'_>, event: &mut Event) {
            record(&self.log, format!("event {} {}", self.name, event.name()));
            event.merge_handled(self.consumes == Some(event.kind()));
        }

        fn on_custom_event(&mut self, _ctx: &mut LayerCtx<'_>, event: &mut CustomEvent) {
            record(&self.log, format!("custom {} {}", self.name, event.name()));
            event.merge_handled(self.consumes_custom);
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            ..Recorder::default()
        }
    }

    fn build(log: &Log, batches: &Batches) -> Application {
        Application::with_ui_overlay(
            AppConfig::default(),
            Box::new(ScriptedWindow {
                log: log.clone(),
                batches: batches.clone(),
            }),
            Box::new(RecordingRenderer {
                log: log.clone(),
                fail_init: false,
            }),
            Box::new(RecordingInput { log: log.clone() }),
            Box::new(RecordingUi { log: log.clone() }),
        )
        .expect("application")
    }

    fn resize(width: u32, height: u32) -> Event {
        Event::new(WindowResizeEvent { width, height })
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn construction_inits_renderer_and_pushes_ui_overlay() {
        let _serial = serial();
        let log = Log::default();
        let app = build(&log, &Batches::default());

        assert_eq!(take(&log), ["renderer init"]);
        assert_eq!(app.layers().names(), ["ui"]);
        assert_eq!(app.layers().overlay_count(), 1);
        assert!(app.is_running());
        assert!(!app.is_minimized());
        assert!(application_exists());
    }

    #[test]
    fn default_overlay_is_the_ui_layer() {
        let _serial = serial();
        let log = Log::default();
        let mut app = Application::new(
            AppConfig::default(),
            Box::new(ScriptedWindow {
                log: log.clone(),
                batches: Batches::default(),
            }),
            Box::new(RecordingRenderer {
                log: log.clone(),
                fail_init: false,
            }),
            Box::new(InputState::new()),
        )
        .expect("application");

        assert_eq!(app.layers().names(), ["UiLayer"]);
        assert!(app.ui_overlay_mut().is_some());

        // Balanced begin/end across frames.
        app.run_frame();
        app.run_frame();
    }

    #[test]
    fn renderer_failure_is_an_error_and_frees_the_slot() {
        let _serial = serial();
        let log = Log::default();
        let result = Application::new(
            AppConfig::default(),
            Box::new(ScriptedWindow {
                log: log.clone(),
                batches: Batches::default(),
            }),
            Box::new(RecordingRenderer {
                log: log.clone(),
                fail_init: true,
            }),
            Box::new(RecordingInput { log: log.clone() }),
        );

        let err = result.err().expect("init must fail");
        assert!(format!("{err:#}").contains("no device"));
        assert!(!application_exists());
    }

    #[test]
    #[should_panic(expected = "Application already exists")]
    fn second_instance_panics() {
        let _serial = serial();
        let log = Log::default();
        let _first = build(&log, &Batches::default());
        let _second = build(&log, &Batches::default());
    }

    #[test]
    fn teardown_detaches_then_shuts_down_renderer() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        app.push_overlay(recorder("B", &log));
        app.push_layer(recorder("C", &log));
        take(&log);

        drop(app);

        assert_eq!(
            take(&log),
            ["detach B", "detach C", "detach A", "renderer shutdown"]
        );
        assert!(!application_exists());
    }

    #[test]
    fn panicking_layer_is_still_detached_during_unwind() {
        let _serial = serial();
        let log = Log::default();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut app = build(&log, &Batches::default());
            app.push_layer(Recorder {
                panic_in_ui: true,
                ..recorder("A", &log)
            });
            app.run_frame();
        }));

        assert!(outcome.is_err());
        let lines = take(&log);
        assert!(lines.contains(&"ui A".to_string()));
        assert!(lines.contains(&"detach A".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("renderer shutdown"));
        assert!(!application_exists());
    }

    #[test]
    fn popped_layer_is_detached_once() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        let a = app.push_layer(recorder("A", &log));
        let b = app.push_overlay(recorder("B", &log));
        take(&log);

        assert!(app.pop_overlay(a).is_none());
        assert!(app.pop_layer(b).is_none());
        assert!(app.pop_layer(a).is_some());
        assert!(app.pop_layer(a).is_none());
        drop(app);

        assert_eq!(take(&log), ["detach A", "detach B", "renderer shutdown"]);
    }

    // ── frame scheduling ──────────────────────────────────────────────────

    #[test]
    fn frame_runs_update_ui_refresh_service_in_order() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        app.push_overlay(recorder("B", &log));
        take(&log);

        app.run_frame();

        assert_eq!(
            take(&log),
            [
                "update A",
                "update B",
                "ui begin",
                "ui A",
                "ui B",
                "ui end",
                "input refresh",
                "service",
            ]
        );
    }

    #[test]
    fn minimized_skips_update_and_ui_but_keeps_servicing() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        take(&log);

        app.on_event(resize(0, 600));
        assert!(app.is_minimized());
        assert!(!app.viewport().is_valid());

        app.run_frame();
        let frame = take(&log);
        assert!(!frame.iter().any(|l| l.starts_with("update") || l.starts_with("ui")));
        assert!(frame.ends_with(&["input refresh".to_string(), "service".to_string()]));
        assert!(!frame.iter().any(|l| l.starts_with("renderer resize")));

        app.on_event(resize(800, 600));
        assert!(!app.is_minimized());
        assert_eq!(app.viewport(), Viewport::new(800.0, 600.0));

        app.run_frame();
        let frame = take(&log);
        assert!(frame.contains(&"renderer resize 800x600".to_string()));
        assert!(frame.contains(&"update A".to_string()));
        assert!(frame.contains(&"ui A".to_string()));
    }

    #[test]
    fn resize_is_not_consumed_by_the_application() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        take(&log);

        assert!(!app.on_event(resize(1024, 768)));
        assert_eq!(
            take(&log),
            ["renderer resize 1024x768", "event A WindowResize"]
        );
    }

    #[test]
    fn close_event_from_service_ends_loop_after_current_iteration() {
        let _serial = serial();
        let log = Log::default();
        let batches = Batches::default();
        batches.borrow_mut().push_back(Vec::new());
        batches.borrow_mut().push_back(vec![Event::new(WindowCloseEvent)]);

        let mut app = build(&log, &batches);
        app.push_layer(recorder("A", &log));
        take(&log);

        app.run();

        let frames = take(&log);
        assert_eq!(frames.iter().filter(|l| *l == "update A").count(), 2);
        assert_eq!(frames.last().map(String::as_str), Some("service"));
        // Close is consumed by the application before any layer sees it.
        assert!(!frames.iter().any(|l| l.contains("WindowClose")));
        assert!(!app.is_running());
    }

    #[test]
    fn close_request_from_a_layer_completes_the_iteration() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(Recorder {
            close_on_update: true,
            ..recorder("A", &log)
        });
        app.push_layer(recorder("B", &log));
        take(&log);

        app.run();

        assert_eq!(
            take(&log),
            [
                "update A",
                "update B",
                "ui begin",
                "ui A",
                "ui B",
                "ui end",
                "input refresh",
                "service",
            ]
        );
    }

    #[test]
    fn explicit_close_stops_before_the_first_iteration() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        take(&log);

        app.close();
        app.run();

        assert!(take(&log).is_empty());
    }

    #[test]
    fn timesteps_follow_the_clock() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        let steps = Rc::new(RefCell::new(Vec::new()));
        app.push_layer(Recorder {
            steps: steps.clone(),
            ..recorder("A", &log)
        });
        app.set_time_source(Box::new(ScriptedClock(RefCell::new(
            [10.000, 10.016, 10.033].into(),
        ))));

        for _ in 0..3 {
            app.run_frame();
        }

        let steps = steps.borrow();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], 0.0);
        assert!((steps[1] - 0.016).abs() < 1e-4);
        assert!((steps[2] - 0.017).abs() < 1e-4);
    }

    #[test]
    fn default_config_keeps_long_timesteps() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        let steps = Rc::new(RefCell::new(Vec::new()));
        app.push_layer(Recorder {
            steps: steps.clone(),
            ..recorder("A", &log)
        });
        app.set_time_source(Box::new(ScriptedClock(RefCell::new(
            [10.0, 10.5, 11.5].into(),
        ))));

        for _ in 0..3 {
            app.run_frame();
        }

        let steps = steps.borrow();
        assert_eq!(steps[0], 0.0);
        assert!((steps[1] - 0.5).abs() < 1e-5);
        assert!((steps[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn configured_clamp_caps_long_timesteps() {
        let _serial = serial();
        let log = Log::default();
        let mut app = Application::with_ui_overlay(
            AppConfig {
                max_timestep: Some(0.25),
                ..AppConfig::default()
            },
            Box::new(ScriptedWindow {
                log: log.clone(),
                batches: Batches::default(),
            }),
            Box::new(RecordingRenderer {
                log: log.clone(),
                fail_init: false,
            }),
            Box::new(RecordingInput { log: log.clone() }),
            Box::new(RecordingUi { log: log.clone() }),
        )
        .expect("application");
        let steps = Rc::new(RefCell::new(Vec::new()));
        app.push_layer(Recorder {
            steps: steps.clone(),
            ..recorder("A", &log)
        });
        app.set_time_source(Box::new(ScriptedClock(RefCell::new([10.0, 10.5].into()))));

        app.run_frame();
        app.run_frame();

        assert!((steps.borrow()[1] - 0.25).abs() < 1e-5);
    }

    // ── phase timing ──────────────────────────────────────────────────────

    #[test]
    fn frame_profile_measures_update_phase() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(Recorder {
            busy_in_update: Some(Duration::from_millis(5)),
            ..recorder("A", &log)
        });

        app.run_frame();

        let profile = app.last_frame_profile();
        assert!(profile.update >= Duration::from_millis(5));
        assert!(profile.total >= profile.update + profile.ui_render + profile.service);
    }

    #[test]
    fn minimized_frame_profiles_no_layer_work() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(Recorder {
            busy_in_update: Some(Duration::from_millis(5)),
            ..recorder("A", &log)
        });
        app.on_event(resize(0, 0));

        app.run_frame();

        let profile = app.last_frame_profile();
        assert_eq!(profile.update, Duration::ZERO);
        assert_eq!(profile.ui_render, Duration::ZERO);
        assert!(profile.total >= profile.service);
    }

    // ── event routing ─────────────────────────────────────────────────────

    #[test]
    fn overlay_consumes_before_layer_sees_it() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        app.push_overlay(Recorder {
            consumes: Some(EventKind::KeyPressed),
            ..recorder("B", &log)
        });
        take(&log);

        let handled = app.on_event(Event::new(KeyPressedEvent {
            key: Key::Space,
            repeat_count: 0,
        }));

        assert!(handled);
        assert_eq!(take(&log), ["event B KeyPressed"]);
    }

    #[test]
    fn unhandled_event_reaches_every_layer_in_reverse_order() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        app.push_layer(recorder("B", &log));
        app.push_overlay(recorder("O", &log));
        take(&log);

        let handled = app.on_event(Event::new(MouseMovedEvent { x: 1.0, y: 2.0 }));

        assert!(!handled);
        assert_eq!(
            take(&log),
            ["event O MouseMoved", "event B MouseMoved", "event A MouseMoved"]
        );
    }

    #[test]
    fn events_delivered_during_service_reach_layers() {
        let _serial = serial();
        let log = Log::default();
        let batches = Batches::default();
        batches
            .borrow_mut()
            .push_back(vec![Event::new(MouseMovedEvent { x: 3.0, y: 4.0 })]);

        let mut app = build(&log, &batches);
        app.push_layer(recorder("A", &log));
        take(&log);

        app.run_frame();

        let frame = take(&log);
        assert_eq!(&frame[frame.len() - 2..], ["service", "event A MouseMoved"]);
    }

    #[test]
    fn layer_turns_on_ui_mouse_capture() {
        let _serial = serial();
        let log = Log::default();
        let mut app = Application::new(
            AppConfig::default(),
            Box::new(ScriptedWindow {
                log: log.clone(),
                batches: Batches::default(),
            }),
            Box::new(RecordingRenderer {
                log: log.clone(),
                fail_init: false,
            }),
            Box::new(InputState::new()),
        )
        .expect("application");
        app.push_layer(Recorder {
            capture_mouse_on_update: true,
            ..recorder("A", &log)
        });
        let moved = || Event::new(MouseMovedEvent { x: 5.0, y: 5.0 });

        // Before any update the overlay lets the mouse through.
        assert!(!app.on_event(moved()));
        assert_eq!(take(&log).last().map(String::as_str), Some("event A MouseMoved"));

        app.run_frame();
        take(&log);

        assert!(app.on_event(moved()));
        assert!(take(&log).is_empty());

        // Keyboard capture was never requested.
        assert!(!app.on_event(Event::new(KeyPressedEvent {
            key: Key::A,
            repeat_count: 0,
        })));
    }

    struct Saved;

    static SAVED: LazyLock<CustomEventKind> =
        LazyLock::new(|| CustomEventKind::register("Saved"));

    impl CustomEventType for Saved {
        fn kind() -> CustomEventKind {
            *SAVED
        }
    }

    #[test]
    fn custom_events_stop_at_the_first_consumer() {
        let _serial = serial();
        let log = Log::default();
        let mut app = build(&log, &Batches::default());
        app.push_layer(recorder("A", &log));
        app.push_layer(Recorder {
            consumes_custom: true,
            ..recorder("B", &log)
        });
        app.push_overlay(recorder("O", &log));
        take(&log);

        assert!(app.on_custom_event(CustomEvent::new(Saved)));
        assert_eq!(take(&log), ["custom O Saved", "custom B Saved"]);
    }
}
