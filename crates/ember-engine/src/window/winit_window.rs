use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as OsWindow, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::events::{Event, WindowCloseEvent};

use super::translate::Translator;
use super::{EventSink, Window, WindowProps};

/// Pumps granted to the platform to deliver `resumed` during startup.
const STARTUP_PUMPS: usize = 64;

#[self_referencing]
struct WindowEntry {
    window: OsWindow,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// State reachable from winit callbacks.
struct Shared {
    props: WindowProps,
    gpu_init: GpuInit,
    entry: Option<WindowEntry>,
    startup_error: Option<anyhow::Error>,
    translator: Translator,
    size: (u32, u32),
    close_sent: bool,
}

impl Shared {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = OsWindow::default_attributes()
            .with_title(self.props.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.props.width),
                f64::from(self.props.height),
            ));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("GPU initialization failed for window")?;

        let gpu = entry.borrow_gpu();
        let size = gpu.size();
        let adapter = gpu.adapter_info();
        log::info!("using GPU adapter '{}' ({:?})", adapter.name, adapter.backend);

        self.size = (size.width, size.height);
        self.entry = Some(entry);
        Ok(())
    }
}

/// Single winit window driven by `pump_app_events`.
///
/// The engine owns the loop, so instead of handing control to
/// `EventLoop::run_app`, every `service` call presents one frame and then
/// pumps whatever the platform has queued without blocking.
pub struct WinitWindow {
    // Declared before the loop so the window is dropped first.
    shared: Shared,
    event_loop: EventLoop<()>,

    /// Events produced while the window was being created.
    pending: Vec<Event>,
}

impl WinitWindow {
    pub fn new(props: WindowProps, gpu_init: GpuInit) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut shared = Shared {
            props,
            gpu_init,
            entry: None,
            startup_error: None,
            translator: Translator::default(),
            size: (0, 0),
            close_sent: false,
        };
        let mut pending = Vec::new();

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(
                Some(Duration::ZERO),
                &mut Pump::new(&mut shared, &mut pending),
            );

            if let Some(err) = shared.startup_error.take() {
                return Err(err);
            }
            if shared.entry.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited during startup (code {code})");
            }
        }

        ensure!(shared.entry.is_some(), "platform never resumed the event loop");

        log::info!(
            "window '{}' created ({}x{})",
            shared.props.title,
            shared.size.0,
            shared.size.1
        );

        Ok(Self {
            shared,
            event_loop,
            pending,
        })
    }

    fn send_close(&mut self, sink: &mut dyn EventSink) {
        if !self.shared.close_sent {
            self.shared.close_sent = true;
            sink.on_event(WindowCloseEvent.into());
        }
    }
}

impl Window for WinitWindow {
    fn title(&self) -> &str {
        &self.shared.props.title
    }

    fn width(&self) -> u32 {
        self.shared.size.0
    }

    fn height(&self) -> u32 {
        self.shared.size.1
    }

    fn service(&mut self, sink: &mut dyn EventSink) {
        for event in self.pending.drain(..) {
            sink.on_event(event);
        }

        let presented = match self.shared.entry.as_mut() {
            Some(entry) => entry.with_mut(|fields| fields.gpu.present(fields.window)),
            None => Ok(false),
        };
        if presented.is_err() {
            log::error!("surface failed beyond recovery; closing window");
            self.send_close(sink);
        }

        let status = self.event_loop.pump_app_events(
            Some(Duration::ZERO),
            &mut Pump::new(&mut self.shared, &mut *sink),
        );

        if let PumpStatus::Exit(code) = status {
            log::info!("platform event loop exited (code {code})");
            self.send_close(sink);
        }
    }
}

/// Per-pump handler: routes translated events straight into the sink.
struct Pump<'a> {
    shared: &'a mut Shared,
    sink: &'a mut dyn EventSink,
    scratch: Vec<Event>,
}

impl<'a> Pump<'a> {
    fn new(shared: &'a mut Shared, sink: &'a mut dyn EventSink) -> Self {
        Self {
            shared,
            sink,
            scratch: Vec::new(),
        }
    }
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.shared.entry.is_some() || self.shared.startup_error.is_some() {
            return;
        }

        if let Err(e) = self.shared.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.shared.startup_error = Some(e);
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(entry) = self.shared.entry.as_mut() else {
            return;
        };

        // Keep the surface in step with the window before anyone sees the event.
        match &event {
            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*size));
                self.shared.size = (size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                self.shared.size = (size.width, size.height);
            }
            WindowEvent::CloseRequested => self.shared.close_sent = true,
            _ => {}
        }

        let scale_factor = match self.shared.entry.as_ref() {
            Some(entry) => entry.with_window(|w| w.scale_factor()),
            None => 1.0,
        };

        self.shared
            .translator
            .translate(scale_factor, &event, &mut self.scratch);

        for e in self.scratch.drain(..) {
            log::trace!("platform event: {e}");
            self.sink.on_event(e);
        }
    }
}
